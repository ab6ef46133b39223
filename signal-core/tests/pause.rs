use signal_core::controller::{NoopSignalOutput, PhaseController, SignalOutput, TickOutcome};
use signal_core::pause::{PauseToggle, PauseTransition};
use signal_core::phases::{Phase, RunMode};

#[derive(Default)]
struct CountingOutput {
    writes: usize,
    last: Option<(bool, bool)>,
}

impl SignalOutput for CountingOutput {
    fn set(&mut self, a: bool, b: bool) {
        self.writes += 1;
        self.last = Some((a, b));
    }
}

#[test]
fn pause_then_resume_restores_auto_position() {
    let mut controller = PhaseController::new(NoopSignalOutput::new());
    controller.tick();
    controller.tick();
    controller.tick();
    let before = controller.state().clone();

    assert!(controller.pause());
    for _ in 0..5 {
        assert_eq!(controller.tick(), TickOutcome::Frozen);
    }
    assert!(controller.resume());

    assert_eq!(controller.state(), &before);
}

#[test]
fn pausing_mid_override_freezes_the_cursor() {
    let mut controller = PhaseController::new(NoopSignalOutput::new());
    controller.submit_override("RGY").expect("valid override");
    controller.tick();
    assert_eq!(controller.cursor(), Some(1));

    let mut toggle = PauseToggle::new();
    assert_eq!(toggle.on_edge(&mut controller), PauseTransition::Paused);
    controller.tick();
    controller.tick();
    assert_eq!(controller.cursor(), Some(1));
    assert_eq!(controller.mode(), RunMode::Manual);

    assert_eq!(toggle.on_edge(&mut controller), PauseTransition::Resumed);
    let TickOutcome::Advanced(next) = controller.tick() else {
        panic!("resumed controller should tick");
    };
    assert_eq!(next.phase, Phase::Green);
    assert_eq!(controller.cursor(), Some(2));
}

#[test]
fn pause_leaves_indicators_lit() {
    let mut controller = PhaseController::new(CountingOutput::default());
    controller.tick();

    controller.pause();
    controller.tick();
    controller.resume();

    assert_eq!(controller.output().writes, 2);
    assert_eq!(controller.output().last, Some((true, true)));
    assert_eq!(controller.phase(), Phase::Yellow);
}
