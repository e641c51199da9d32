/// Sound effects: short procedural tones played through rodio.
///
/// Every effect is synthesized once at start-up into an in-memory WAV
/// buffer and replayed fire-and-forget on a detached `Sink`.
///
///   defuse   rising three-note chime
///   clear    four-note fanfare with a held top note
///   bump     low thud when a move hits the border
///   reveal   two-note blip when mine visibility flips
///   splash   one tick per logo step, pitch rising with progress
///
/// Without the `sound` feature `SoundEngine` is an empty stub.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        defuse: Arc<Vec<u8>>,
        clear: Arc<Vec<u8>>,
        bump: Arc<Vec<u8>>,
        reveal: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// None when no output device could be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                defuse: Arc::new(make_wav(&gen_defuse())),
                clear: Arc::new(make_wav(&gen_clear())),
                bump: Arc::new(make_wav(&gen_bump())),
                reveal: Arc::new(make_wav(&gen_reveal())),
            })
        }

        fn play_buf(&self, buf: Vec<u8>) {
            let Ok(sink) = Sink::try_new(&self.handle) else { return };
            if let Ok(src) = Decoder::new(Cursor::new(buf)) {
                sink.append(src);
                sink.detach();
            }
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            self.play_buf(buf.as_ref().clone());
        }

        pub fn play_defuse(&self) { self.play(&self.defuse); }
        pub fn play_clear(&self) { self.play(&self.clear); }
        pub fn play_bump(&self) { self.play(&self.bump); }
        pub fn play_reveal(&self) { self.play(&self.reveal); }

        /// Tick for logo step `step` of `total`.
        pub fn play_splash_tick(&self, step: usize, total: usize) {
            let ratio = step as f32 / total.max(1) as f32;
            self.play_buf(make_wav(&tone(220.0 + ratio * 660.0, 0.03, 0.2, Envelope::Linear)));
        }
    }

    // ── Synthesis ──

    #[derive(Clone, Copy)]
    enum Envelope {
        /// Straight fade to silence.
        Linear,
        /// Fast attack, quick drop, long tail.
        Pluck,
        /// Mostly held, fading by a third.
        Sustain,
    }

    impl Envelope {
        fn at(self, progress: f32) -> f32 {
            match self {
                Envelope::Linear => 1.0 - progress,
                Envelope::Pluck => 1.0 - progress.sqrt(),
                Envelope::Sustain => 1.0 - progress * 0.3,
            }
        }
    }

    /// One note: fundamental plus a little third harmonic.
    fn tone(freq: f32, secs: f32, volume: f32, env: Envelope) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let wave = (t * freq * TAU).sin() * 0.8 + (t * freq * 3.0 * TAU).sin() * 0.2;
                wave * env.at(i as f32 / n as f32) * volume
            })
            .collect()
    }

    fn melody(notes: &[(f32, f32)], volume: f32, env: Envelope) -> Vec<f32> {
        notes.iter().flat_map(|&(f, d)| tone(f, d, volume, env)).collect()
    }

    /// E6 → G6 → B6
    fn gen_defuse() -> Vec<f32> {
        melody(&[(1319.0, 0.04), (1568.0, 0.04), (1976.0, 0.07)], 0.25, Envelope::Pluck)
    }

    /// C5 → E5 → G5 → C6, then C6 held and fading out.
    fn gen_clear() -> Vec<f32> {
        let mut s = melody(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1)], 0.3, Envelope::Sustain);
        s.extend(tone(1047.0, 0.3, 0.3, Envelope::Linear));
        s
    }

    /// 90 Hz dropping to 60 Hz.
    fn gen_bump() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.06) as usize;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let t = i as f32 / SAMPLE_RATE as f32;
                (t * (90.0 - 30.0 * p) * TAU).sin() * (1.0 - p) * 0.35
            })
            .collect()
    }

    fn gen_reveal() -> Vec<f32> {
        melody(&[(880.0, 0.05), (660.0, 0.07)], 0.2, Envelope::Pluck)
    }

    /// 16-bit mono PCM in a RIFF/WAVE container.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const HEADER_LEN: usize = 44;
        let data_len = (samples.len() * 2) as u32;

        let mut buf = Vec::with_capacity(HEADER_LEN + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        buf.extend_from_slice(&2u16.to_le_bytes()); // block align
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());

        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_defuse(&self) {}
    pub fn play_clear(&self) {}
    pub fn play_bump(&self) {}
    pub fn play_reveal(&self) {}
    pub fn play_splash_tick(&self, _step: usize, _total: usize) {}
}
