//! Sample playback
//!
//! Sound balls do not synthesize anything: every hit replays one preloaded
//! sample at a pitch-dependent rate, panned by horizontal position and scaled
//! by vertical position. The simulation only builds [`PlaybackRequest`]s and
//! hands them to an [`AudioSink`]; what happens next is the sink's business.

use std::cell::{Cell, RefCell};

use glam::DVec2;

use crate::semitones_to_rate;
use crate::sim::Viewport;

/// One-shot playback parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRequest {
    /// Playback rate multiplier (1.0 = original pitch)
    pub playback_rate: f64,
    /// Stereo pan in [-1, 1], left to right
    pub pan: f64,
    /// Volume, 0 at the top of the viewport and 1 at the bottom
    pub gain: f64,
}

impl PlaybackRequest {
    /// Build the request for a note at `center` inside `viewport`
    ///
    /// A zero-sized viewport axis yields a centred pan or silence instead of
    /// dividing by zero.
    pub fn for_position(pitch: f64, center: DVec2, viewport: Viewport) -> Self {
        let pan = if viewport.width > 0.0 {
            center.x / viewport.width * 2.0 - 1.0
        } else {
            0.0
        };
        let gain = if viewport.height > 0.0 {
            center.y / viewport.height
        } else {
            0.0
        };
        Self {
            playback_rate: semitones_to_rate(pitch),
            pan,
            gain,
        }
    }
}

/// Anything that can start a one-shot sample playback
///
/// Playback is fire-and-forget: `play` must not block, and failures are the
/// sink's own concern.
pub trait AudioSink {
    fn play(&self, request: PlaybackRequest);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    played: Cell<usize>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests received so far
    pub fn played(&self) -> usize {
        self.played.get()
    }
}

impl AudioSink for LogSink {
    fn play(&self, request: PlaybackRequest) {
        self.played.set(self.played.get() + 1);
        log::debug!(
            "note: rate={:.3} pan={:.2} gain={:.2}",
            request.playback_rate,
            request.pan,
            request.gain
        );
    }
}

/// Sink that keeps every request, for tests and tooling
#[derive(Debug, Default)]
pub struct RecordingSink {
    requests: RefCell<Vec<PlaybackRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<PlaybackRequest> {
        self.requests.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }
}

impl AudioSink for RecordingSink {
    fn play(&self, request: PlaybackRequest) {
        self.requests.borrow_mut().push(request);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    //! Web Audio sink: buffer source -> stereo panner -> gain -> compressor

    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioContext, DynamicsCompressorNode, Response};

    use super::{AudioSink, PlaybackRequest};
    use crate::settings::CompressorSettings;

    /// Audio sink backed by an `AudioContext` and one decoded sample
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        output: Option<DynamicsCompressorNode>,
        sample: Rc<RefCell<Option<AudioBuffer>>>,
    }

    impl WebAudioSink {
        pub fn new(compressor: &CompressorSettings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let output = ctx.as_ref().and_then(|ctx| {
                let node = ctx.create_dynamics_compressor().ok()?;
                node.threshold().set_value(compressor.threshold);
                node.knee().set_value(compressor.knee);
                node.ratio().set_value(compressor.ratio);
                node.attack().set_value(compressor.attack);
                node.release().set_value(compressor.release);
                node.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(node)
            });
            Self {
                ctx,
                output,
                sample: Rc::new(RefCell::new(None)),
            }
        }

        /// True once the sample has been fetched and decoded
        pub fn is_ready(&self) -> bool {
            self.sample.borrow().is_some()
        }

        /// Fetch and decode the note sample
        ///
        /// Requests made before this resolves are dropped.
        pub async fn load_sample(&self, url: &str) {
            let Some(ctx) = &self.ctx else { return };
            match fetch_and_decode(ctx, url).await {
                Some(buffer) => {
                    log::info!("Loaded sample {} ({:.2}s)", url, buffer.duration());
                    *self.sample.borrow_mut() = Some(buffer);
                }
                None => log::error!("Cannot load sound file {}", url),
            }
        }
    }

    async fn fetch_and_decode(ctx: &AudioContext, url: &str) -> Option<AudioBuffer> {
        let window = web_sys::window()?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .ok()?
            .dyn_into()
            .ok()?;
        if !response.ok() {
            return None;
        }
        let data = JsFuture::from(response.array_buffer().ok()?).await.ok()?;
        let data: js_sys::ArrayBuffer = data.dyn_into().ok()?;
        let decoded = JsFuture::from(ctx.decode_audio_data(&data).ok()?)
            .await
            .ok()?;
        decoded.dyn_into().ok()
    }

    impl AudioSink for WebAudioSink {
        fn play(&self, request: PlaybackRequest) {
            let (Some(ctx), Some(output)) = (&self.ctx, &self.output) else {
                return;
            };
            if !self.is_ready() {
                log::debug!("Sample not loaded yet, dropping note");
                return;
            }
            let sample = self.sample.borrow();
            let Some(buffer) = sample.as_ref() else {
                return;
            };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let started = (|| {
                let source = ctx.create_buffer_source().ok()?;
                source.set_buffer(Some(buffer));
                source.set_loop(false);
                source
                    .playback_rate()
                    .set_value(request.playback_rate as f32);

                let panner = ctx.create_stereo_panner().ok()?;
                panner.pan().set_value(request.pan.clamp(-1.0, 1.0) as f32);

                let gain = ctx.create_gain().ok()?;
                gain.gain().set_value(request.gain.max(0.0) as f32);

                source.connect_with_audio_node(&panner).ok()?;
                panner.connect_with_audio_node(&gain).ok()?;
                gain.connect_with_audio_node(output).ok()?;
                source.start().ok()
            })();

            if started.is_none() {
                log::warn!("Failed to start sample playback");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_position() {
        let viewport = Viewport::new(800.0, 600.0);
        let req = PlaybackRequest::for_position(0.0, DVec2::new(400.0, 600.0), viewport);
        assert_eq!(req.playback_rate, 1.0);
        assert_eq!(req.pan, 0.0);
        assert_eq!(req.gain, 1.0);

        let req = PlaybackRequest::for_position(12.0, DVec2::new(0.0, 0.0), viewport);
        assert!((req.playback_rate - 2.0).abs() < 1e-12);
        assert_eq!(req.pan, -1.0);
        assert_eq!(req.gain, 0.0);

        let req = PlaybackRequest::for_position(0.0, DVec2::new(800.0, 150.0), viewport);
        assert_eq!(req.pan, 1.0);
        assert_eq!(req.gain, 0.25);
    }

    #[test]
    fn test_request_degenerate_viewport() {
        let req = PlaybackRequest::for_position(0.0, DVec2::new(10.0, 10.0), Viewport::default());
        assert_eq!(req.pan, 0.0);
        assert_eq!(req.gain, 0.0);
        assert!(req.playback_rate.is_finite());
    }

    #[test]
    fn test_sinks_count_requests() {
        let log_sink = LogSink::new();
        let rec = RecordingSink::new();
        let req = PlaybackRequest {
            playback_rate: 1.0,
            pan: 0.0,
            gain: 0.5,
        };
        log_sink.play(req);
        log_sink.play(req);
        rec.play(req);
        assert_eq!(log_sink.played(), 2);
        assert_eq!(rec.requests(), vec![req]);
    }
}
