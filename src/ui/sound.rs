/// Sound engine: procedural sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
/// The sfx volume from the settings panel scales every effect sink.
/// A quiet generated loop plays on its own sink at the music volume.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

/// One sound effect per hub moment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Open,
    Close,
    LevelWon,
    Unlock,
    LifeLost,
    GameWon,
    GameLost,
    Click,
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;

    const ALL: [Sfx; 8] = [
        Sfx::Open,
        Sfx::Close,
        Sfx::LevelWon,
        Sfx::Unlock,
        Sfx::LifeLost,
        Sfx::GameWon,
        Sfx::GameLost,
        Sfx::Click,
    ];

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: HashMap<Sfx, Arc<Vec<u8>>>,
        blips: Vec<Arc<Vec<u8>>>,
        volume: f32,
        music: Option<Sink>,
        music_volume: f32,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            let buffers = ALL
                .iter()
                .map(|&sfx| (sfx, Arc::new(make_wav(&generate(sfx)))))
                .collect();
            // Typewriter blips walk up a short scale
            let blips = [440.0_f32, 494.0, 523.0, 587.0, 659.0]
                .iter()
                .map(|&f| Arc::new(make_wav(&gen_blip(f, 0.03, 0.2))))
                .collect();

            let mut engine = SoundEngine {
                _stream: stream,
                handle,
                buffers,
                blips,
                volume: 1.0,
                music: None,
                music_volume: 0.0,
            };
            engine.start_music();
            Some(engine)
        }

        /// Loop the background tune forever. Silent until a music volume
        /// is set.
        fn start_music(&mut self) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    log::warn!("music sink unavailable: {e}");
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(make_wav(&music_loop()))) {
                Ok(src) => {
                    sink.set_volume(self.music_volume);
                    sink.append(src.repeat_infinite());
                    self.music = Some(sink);
                }
                Err(e) => log::warn!("music decode failed: {e}"),
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn set_music_volume(&mut self, volume: f32) {
            self.music_volume = volume.clamp(0.0, 1.0);
            if let Some(sink) = &self.music {
                sink.set_volume(self.music_volume);
            }
        }

        fn play_buf(&self, buf: &Arc<Vec<u8>>) {
            if self.volume <= 0.0 {
                return;
            }
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.set_volume(self.volume);
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play(&self, sfx: Sfx) {
            if let Some(buf) = self.buffers.get(&sfx) {
                self.play_buf(buf);
            }
        }

        /// Typewriter tick; `n` picks the pitch.
        pub fn play_blip(&self, n: usize) {
            if let Some(buf) = self.blips.get(n % self.blips.len().max(1)) {
                self.play_buf(buf);
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn generate(sfx: Sfx) -> Vec<f32> {
        match sfx {
            // C5 → G5, quick
            Sfx::Open => notes(&[(523.0, 0.05), (784.0, 0.07)], 0.25),
            Sfx::Close => notes(&[(784.0, 0.05), (523.0, 0.07)], 0.22),
            Sfx::LevelWon => notes(&[(523.0, 0.08), (659.0, 0.08), (784.0, 0.08), (1047.0, 0.2)], 0.3),
            Sfx::Unlock => notes(&[(1319.0, 0.04), (1568.0, 0.09)], 0.22),
            Sfx::LifeLost => sweep(600.0, 200.0, 0.2, 0.25),
            Sfx::GameWon => notes(
                &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1), (784.0, 0.08), (1047.0, 0.35)],
                0.3,
            ),
            // A4 → F#4 → Eb4 → C4
            Sfx::GameLost => notes(&[(440.0, 0.14), (370.0, 0.14), (311.0, 0.14), (261.0, 0.3)], 0.3),
            Sfx::Click => gen_blip(880.0, 0.02, 0.2),
        }
    }

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32); // linear fade out
                (t * freq * 2.0 * PI).sin() * env * volume
            })
            .collect()
    }

    /// Note sequence; sine + octave for a slightly brighter tone.
    fn notes(seq: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in seq {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * PI).sin() * 0.7 + (t * freq * 4.0 * PI).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Slow A-minor arpeggio, about four seconds. Starts and ends near
    /// silence so the loop seam does not click.
    fn music_loop() -> Vec<f32> {
        notes(
            &[
                (220.0, 0.5),
                (262.0, 0.5),
                (330.0, 0.5),
                (262.0, 0.5),
                (196.0, 0.5),
                (247.0, 0.5),
                (294.0, 0.5),
                (247.0, 0.5),
            ],
            0.12,
        )
    }

    /// Descending whistle.
    fn sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = from + (to - from) * t;
                phase += freq * 2.0 * PI / SAMPLE_RATE as f32;
                phase.sin() * (1.0 - t).powf(0.6) * volume
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_sample_count() {
            let wav = make_wav(&[0.0; 100]);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(wav.len(), 44 + 200);
        }

        #[test]
        fn every_effect_has_samples() {
            for sfx in ALL {
                let s = generate(sfx);
                assert!(!s.is_empty(), "{sfx:?}");
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }

        #[test]
        fn music_loop_is_quiet_and_seamless() {
            let s = music_loop();
            assert!(s.len() as u32 >= SAMPLE_RATE * 3);
            assert!(s.iter().all(|v| v.abs() <= 0.121));
            assert!(s[0].abs() < 1e-6);
            assert!(s[s.len() - 1].abs() < 0.02);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API, compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn set_volume(&mut self, _volume: f32) {}
    pub fn set_music_volume(&mut self, _volume: f32) {}
    pub fn play(&self, _sfx: Sfx) {}
    pub fn play_blip(&self, _n: usize) {}
}
