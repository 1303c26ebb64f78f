//! Renderer collaborator interface.
//!
//! Presentation lives outside the core. A transport feeds each event, in
//! order, to a [`FightRenderer`] and asks it for frames at its own pace; the
//! simulation never calls a renderer itself.

use crate::events::FightEvent;

/// Something that turns the event stream into frames.
pub trait FightRenderer {
    /// Renderer-specific settings passed to [`FightRenderer::init`].
    type Config;
    /// Output of one [`FightRenderer::render`] call.
    type Frame;

    /// Prepare for a new match.
    fn init(&mut self, fighter_a_name: &str, fighter_b_name: &str, config: &Self::Config);

    /// Fold one event into the renderer's internal state.
    ///
    /// Must not have externally observable side effects; output happens in
    /// [`FightRenderer::render`].
    fn handle_event(&mut self, event: &FightEvent);

    /// Produce a frame, advancing any animation by `delta_time` seconds.
    fn render(&mut self, delta_time: f64) -> Self::Frame;

    /// Release resources. The default does nothing.
    fn destroy(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[derive(Default)]
    struct Counter {
        names: Option<(String, String)>,
        seen: usize,
        elapsed: f64,
    }

    impl FightRenderer for Counter {
        type Config = ();
        type Frame = String;

        fn init(&mut self, a: &str, b: &str, _config: &()) {
            self.names = Some((a.to_string(), b.to_string()));
        }

        fn handle_event(&mut self, _event: &FightEvent) {
            self.seen += 1;
        }

        fn render(&mut self, delta_time: f64) -> String {
            self.elapsed += delta_time;
            format!("{} events", self.seen)
        }
    }

    #[test]
    fn test_renderer_contract() {
        let mut renderer = Counter::default();
        renderer.init("Red", "Blue", &());
        renderer.handle_event(&FightEvent::new(0.0, 1, EventKind::RoundStart));
        assert_eq!(renderer.render(0.5), "1 events");
        renderer.destroy();
        assert_eq!(renderer.names, Some(("Red".to_string(), "Blue".to_string())));
        assert!((renderer.elapsed - 0.5).abs() < f64::EPSILON);
    }
}
