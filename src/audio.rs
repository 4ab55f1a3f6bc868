//! Audio engine: semantic cues rendered by a tiny procedural synth
//!
//! The simulation never talks about waveforms. It reports what
//! happened (a fragment was collected, the exit opened, the stalker is
//! close) and this module turns that into sound: a low ambient drone,
//! a proximity voice that sharpens with pursuit stress, and a handful
//! of one-shot voices. Everything is synthesized in the cpal output
//! callback; when no output device exists (or on wasm) the engine
//! degrades to silence without complaining.

use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
#[cfg(not(target_arch = "wasm32"))]
use cpal::{SampleRate, Stream, StreamConfig};

/// Sample rate for audio output
pub const SAMPLE_RATE: u32 = 44100;

const TAU: f32 = std::f32::consts::TAU;

/// Cheap uniform noise for footsteps and the screamer
fn xorshift(seed: &mut u32) -> f32 {
    let mut x = *seed;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *seed = x;
    (x as f32 / u32::MAX as f32) * 2.0 - 1.0
}

/// A transient voice, dropped once its envelope dies out
enum OneShot {
    /// Low-passed noise burst
    Footstep { t: f32, cutoff: f32, lp: f32 },
    /// Descending sine blip for a pickup
    Collect { t: f32, phase: f32 },
    /// Saw drop plus noise impact on a loss
    Screamer { t: f32, phase: f32 },
}

/// Synth state shared between the game thread and the audio callback
struct SynthState {
    started: bool,
    master: f32,
    master_target: f32,
    /// Ambient drone: slow-filtered saw
    drone_gain: f32,
    drone_target: f32,
    drone_phase: f32,
    drone_lp: f32,
    lfo_phase: f32,
    /// Proximity voice follows pursuit stress
    stress: f32,
    stress_target: f32,
    stress_phase: f32,
    /// Alarm after the exit opens: a saw sweeping down and holding
    alarm: Option<(f32, f32)>,
    shots: Vec<OneShot>,
    /// Set by alarm/screamer; the stress voice stays quiet after
    panic: bool,
    noise: u32,
}

impl SynthState {
    fn new() -> Self {
        Self {
            started: false,
            master: 0.5,
            master_target: 0.5,
            drone_gain: 0.0,
            drone_target: 0.3,
            drone_phase: 0.0,
            drone_lp: 0.0,
            lfo_phase: 0.0,
            stress: 0.0,
            stress_target: 0.0,
            stress_phase: 0.0,
            alarm: None,
            shots: Vec::new(),
            panic: false,
            noise: 0x9e3779b9,
        }
    }

    /// Interleave one mono mix into a stereo buffer
    fn render(&mut self, data: &mut [f32]) {
        if !self.started {
            for sample in data.iter_mut() {
                *sample = 0.0;
            }
            return;
        }
        for frame in data.chunks_mut(2) {
            let s = self.sample();
            for out in frame.iter_mut() {
                *out = s;
            }
        }
    }

    /// One mono sample of the whole mix
    fn sample(&mut self) -> f32 {
        let dt = 1.0 / SAMPLE_RATE as f32;
        let mut mix = 0.0;

        // Drone: 55 Hz saw through a low-pass that breathes at 0.1 Hz
        self.drone_gain += (self.drone_target - self.drone_gain) * dt;
        if self.drone_gain > 1e-4 {
            self.lfo_phase = (self.lfo_phase + 0.1 * dt) % 1.0;
            let cutoff = 180.0 + (self.lfo_phase * TAU).sin() * 20.0;
            self.drone_phase = (self.drone_phase + 55.0 * dt) % 1.0;
            let saw = self.drone_phase * 2.0 - 1.0;
            let alpha = (TAU * cutoff * dt).min(1.0);
            self.drone_lp += (saw - self.drone_lp) * alpha;
            mix += self.drone_lp * self.drone_gain;
        }

        // Proximity voice: triangle that climbs from 80 Hz with stress
        self.stress += (self.stress_target - self.stress) * 10.0 * dt;
        if !self.panic && self.stress > 1e-3 {
            let freq = 80.0 + self.stress * 500.0;
            self.stress_phase = (self.stress_phase + freq * dt) % 1.0;
            let tri = 4.0 * (self.stress_phase - 0.5).abs() - 1.0;
            mix += tri * self.stress.powi(3) * 0.8;
        }

        if let Some((ref mut t, ref mut phase)) = self.alarm {
            *t += dt;
            let freq = if *t < 3.0 {
                400.0 + (150.0 - 400.0) * (*t / 3.0)
            } else {
                150.0
            };
            *phase = (*phase + freq * dt) % 1.0;
            mix += (*phase * 2.0 - 1.0) * 0.4;
        }

        let noise = &mut self.noise;
        self.shots.retain_mut(|shot| match shot {
            OneShot::Footstep { t, cutoff, lp } => {
                *t += dt;
                let alpha = (TAU * *cutoff * dt).min(1.0);
                *lp += (xorshift(noise) - *lp) * alpha;
                mix += *lp * 0.2 * (-*t / 0.05).exp();
                *t < 0.2
            }
            OneShot::Collect { t, phase } => {
                *t += dt;
                let freq = 800.0 * (200.0_f32 / 800.0).powf(*t / 0.3);
                *phase = (*phase + freq * dt) % 1.0;
                mix += (*phase * TAU).sin() * 0.1 * (-*t / 0.1).exp();
                *t < 0.35
            }
            OneShot::Screamer { t, phase } => {
                *t += dt;
                let freq = 800.0 * (100.0_f32 / 800.0).powf((*t / 0.5).min(1.0));
                *phase = (*phase + freq * dt) % 1.0;
                let body = (*phase * 2.0 - 1.0) + xorshift(noise) * 0.6;
                mix += body * (-*t / 0.4).exp();
                *t < 1.5
            }
        });

        self.master += (self.master_target - self.master) * dt;
        (mix * self.master).clamp(-1.0, 1.0)
    }
}

/// Handle the game thread talks to
pub struct AudioEngine {
    state: Arc<Mutex<SynthState>>,
    #[cfg(not(target_arch = "wasm32"))]
    _stream: Option<Stream>,
}

impl AudioEngine {
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(SynthState::new()));

        #[cfg(not(target_arch = "wasm32"))]
        let stream = Self::init_audio_stream(Arc::clone(&state));

        Self {
            state,
            #[cfg(not(target_arch = "wasm32"))]
            _stream: stream,
        }
    }

    /// Build the output stream; None leaves the engine silent
    #[cfg(not(target_arch = "wasm32"))]
    fn init_audio_stream(state: Arc<Mutex<SynthState>>) -> Option<Stream> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;

        let config = StreamConfig {
            channels: 2,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    state.lock().unwrap().render(data);
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .ok()?;

        stream.play().ok()?;
        Some(stream)
    }

    /// Unmute the mix. Deferred to the first click so the drone does
    /// not play over the title screen.
    pub fn start(&self) {
        self.state.lock().unwrap().started = true;
    }

    /// Continuous pursuit stress, 0 far away to 1 at capture range
    pub fn set_stress(&self, stress: f32) {
        let mut s = self.state.lock().unwrap();
        s.stress_target = stress.clamp(0.0, 1.0);
    }

    pub fn footstep(&self) {
        let mut s = self.state.lock().unwrap();
        let cutoff = 300.0 + (xorshift(&mut s.noise) * 0.5 + 0.5) * 100.0;
        s.shots.push(OneShot::Footstep { t: 0.0, cutoff, lp: 0.0 });
    }

    pub fn fragment_collected(&self) {
        let mut s = self.state.lock().unwrap();
        s.shots.push(OneShot::Collect { t: 0.0, phase: 0.0 });
    }

    /// The exit opened: kill the drone, start the alarm sweep
    pub fn exit_spawned(&self) {
        let mut s = self.state.lock().unwrap();
        if s.panic {
            return;
        }
        s.panic = true;
        s.drone_target = 0.0;
        s.alarm = Some((0.0, 0.0));
    }

    /// Caught or out of time
    pub fn captured(&self) {
        let mut s = self.state.lock().unwrap();
        s.panic = true;
        s.shots.push(OneShot::Screamer { t: 0.0, phase: 0.0 });
    }

    /// Out through the exit: let everything fade
    pub fn escaped(&self) {
        let mut s = self.state.lock().unwrap();
        s.master_target = 0.0;
        s.alarm = None;
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}
