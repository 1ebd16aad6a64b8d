//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and background music - no external
//! files needed!

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use web_sys::{
    AudioContext, AudioContextState, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
};

use crate::consts::DEFAULT_MUSIC_VOLUME;
use crate::sim::{SessionEffect, SoundCue};

/// Harmonic minor scale the music loop picks from (C4..B4)
const MUSIC_NOTES: [f32; 7] = [261.63, 293.66, 311.13, 349.23, 392.00, 415.30, 493.88];
/// Seconds between music notes
const NOTE_SPACING: f64 = 0.5;
/// How far ahead of the audio clock notes are scheduled
const SCHEDULE_AHEAD: f64 = 0.1;
/// Length of each music note
const NOTE_LENGTH: f64 = 1.5;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music_gain: Option<GainNode>,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    music_playing: bool,
    next_note_time: f64,
    rng: Pcg32,
}

impl AudioManager {
    pub fn new(seed: u64) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }

        let music_gain = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(DEFAULT_MUSIC_VOLUME);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });

        Self {
            ctx,
            music_gain,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sfx_volume: 1.0,
            muted: false,
            music_playing: false,
            next_note_time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Suspend the audio clock (pause)
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.sync_music_gain();
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sync_music_gain();
    }

    fn sync_music_gain(&self) {
        if let Some(gain) = &self.music_gain {
            let vol = if self.muted { 0.0 } else { self.music_volume };
            gain.gain().set_value(vol);
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Perform the audio side of a session effect (others are ignored)
    pub fn apply(&mut self, effect: &SessionEffect) {
        match effect {
            SessionEffect::Sound(cue) => self.play(*cue),
            SessionEffect::StartMusic => self.start_music(),
            SessionEffect::StopMusic => self.stop_music(),
            SessionEffect::SuspendAudio => self.suspend(),
            SessionEffect::ResumeAudio => self.resume(),
            SessionEffect::SetMusicVolume(vol) => self.set_music_volume(*vol),
            SessionEffect::Schedule { .. }
            | SessionEffect::Cancel(_)
            | SessionEffect::FetchPrize { .. } => {}
        }
    }

    // === Music ===

    pub fn start_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if self.music_playing && ctx.state() == AudioContextState::Running {
            return;
        }
        let _ = ctx.resume();
        self.music_playing = true;
        self.next_note_time = ctx.current_time() + 0.1;
        log::debug!("Music started");
    }

    pub fn stop_music(&mut self) {
        self.music_playing = false;
    }

    /// Schedule upcoming music notes; call every frame
    pub fn pump(&mut self) {
        if !self.music_playing {
            return;
        }
        let (Some(ctx), Some(music_gain)) = (&self.ctx, &self.music_gain) else {
            return;
        };
        if ctx.state() == AudioContextState::Suspended {
            return;
        }

        let t = ctx.current_time();
        // Fell far behind (hidden tab): restart the phrase instead of a flurry
        if self.next_note_time < t {
            self.next_note_time = t + 0.05;
        }

        while self.next_note_time < t + SCHEDULE_AHEAD {
            let note = MUSIC_NOTES[self.rng.random_range(0..MUSIC_NOTES.len())];
            let at = self.next_note_time;

            if let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) {
                osc.set_type(OscillatorType::Triangle);
                osc.frequency().set_value(note);
                if osc.connect_with_audio_node(&gain).is_ok()
                    && gain.connect_with_audio_node(music_gain).is_ok()
                {
                    gain.gain().set_value_at_time(0.0, at).ok();
                    gain.gain().linear_ramp_to_value_at_time(0.05, at + 0.1).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.001, at + NOTE_LENGTH)
                        .ok();
                    osc.start_with_when(at).ok();
                    osc.stop_with_when(at + NOTE_LENGTH).ok();
                }
            }

            self.next_note_time += NOTE_SPACING;
        }
    }

    // === Sound effects ===

    /// Play a sound effect
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = self.ctx.clone() else { return };

        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Click => self.play_click(&ctx, vol),
            SoundCue::Dough => self.play_dough(&ctx, vol),
            SoundCue::Glaze => self.play_glaze(&ctx, vol),
            SoundCue::Sprinkles => self.play_sprinkles(&ctx, vol),
            SoundCue::Filling => self.play_filling(&ctx, vol),
            SoundCue::Success => self.play_success(&ctx, vol),
            SoundCue::Win => self.play_win(&ctx, vol),
            SoundCue::Prize => self.play_prize(&ctx, vol),
            SoundCue::Fail => self.play_fail(&ctx, vol),
            SoundCue::GameOver => self.play_game_over(&ctx, vol),
            SoundCue::Tick => self.play_tick(&ctx, vol),
            SoundCue::Serve => self.play_serve(&ctx, vol),
            SoundCue::Bonus => self.play_bonus(&ctx, vol),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Click - short upward blip
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.05)
            .ok();
        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Dough - soft dull thud
    fn play_dough(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(180.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Glaze - glossy sweep
    fn play_glaze(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(600.0, t + 0.15).ok();
        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.001, t + 0.15).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Sprinkles - two tiny high ticks
    fn play_sprinkles(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        for (freq, offset, level, len) in [(1400.0, 0.0, 0.03, 0.03), (1600.0, 0.04, 0.02, 0.03)] {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) {
                let at = t + offset;
                gain.gain().set_value_at_time(vol * level, at).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, at + len)
                    .ok();
                osc.start_with_when(at).ok();
                osc.stop_with_when(at + len).ok();
            }
        }
    }

    /// Filling - bloop
    fn play_filling(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(500.0, t + 0.1).ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Success - C major arpeggio chime
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 523.25, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        for (i, freq) in [523.25, 659.25, 783.99, 1046.50].iter().enumerate() {
            osc.frequency()
                .set_value_at_time(*freq, t + i as f64 * 0.1)
                .ok();
        }
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.8).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.8).ok();
    }

    /// Win - octave sweep up
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(440.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(880.0, t + 0.5)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.01, t + 1.0).ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.0).ok();
    }

    /// Prize - magical arpeggio
    fn play_prize(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 554.0, 659.0, 880.0, 1108.0].iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + i as f64 * 0.1;
                gain.gain().set_value_at_time(vol * 0.05, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 1.0)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 1.0).ok();
            }
        }
    }

    /// Fail - buzzy slide down
    fn play_fail(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(80.0, t + 0.4).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.4).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    /// Game over - long descend
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 1.0)
            .ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.001, t + 1.0).ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.0).ok();
    }

    /// Tick - low-time warning
    fn play_tick(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.02, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Serve - filtered noise whoosh
    fn play_serve(&mut self, ctx: &AudioContext, vol: f32) {
        let rate = ctx.sample_rate();
        let len = (rate * 0.3) as u32;
        let Ok(buffer) = ctx.create_buffer(1, len, rate) else {
            return;
        };
        let mut samples: Vec<f32> = (0..len)
            .map(|_| self.rng.random::<f32>() * 2.0 - 1.0)
            .collect();
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let (Ok(noise), Ok(filter), Ok(gain)) = (
            ctx.create_buffer_source(),
            ctx.create_biquad_filter(),
            ctx.create_gain(),
        ) else {
            return;
        };
        let t = ctx.current_time();

        noise.set_buffer(Some(&buffer));
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value_at_time(400.0, t).ok();
        filter.frequency().linear_ramp_to_value_at_time(1000.0, t + 0.2).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.01, t + 0.3).ok();

        let wired = noise.connect_with_audio_node(&filter).is_ok()
            && filter.connect_with_audio_node(&gain).is_ok()
            && gain.connect_with_audio_node(&ctx.destination()).is_ok();
        if wired {
            noise.start_with_when(t).ok();
        }
    }

    /// Bonus - power-up sweep
    fn play_bonus(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(1200.0, t + 0.3).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }
}
