use signal_core::controller::{PhaseController, SignalOutput, TickOutcome};
use signal_core::phases::{Direction, DwellClass, IndicatorPair, Phase, RunMode};

#[derive(Default)]
struct RecordingOutput {
    writes: Vec<IndicatorPair>,
}

impl SignalOutput for RecordingOutput {
    fn set(&mut self, a: bool, b: bool) {
        self.writes.push(IndicatorPair::new(a, b));
    }
}

fn advance<D: SignalOutput>(controller: &mut PhaseController<D>) -> Phase {
    match controller.tick() {
        TickOutcome::Advanced(step) => {
            assert_eq!(step.dwell, DwellClass::Auto);
            step.phase
        }
        TickOutcome::Frozen => panic!("controller unexpectedly paused"),
    }
}

#[test]
fn auto_cycle_bounces_between_red_and_green() {
    let mut controller = PhaseController::new(RecordingOutput::default());
    assert_eq!(controller.phase(), Phase::Red);
    assert_eq!(controller.direction(), Direction::Forward);

    let observed: Vec<Phase> = (0..8).map(|_| advance(&mut controller)).collect();
    assert_eq!(
        observed,
        vec![
            Phase::Yellow,
            Phase::Green,
            Phase::Yellow,
            Phase::Red,
            Phase::Yellow,
            Phase::Green,
            Phase::Yellow,
            Phase::Red,
        ]
    );
    assert_eq!(controller.mode(), RunMode::Auto);
}

#[test]
fn direction_flips_only_at_the_ends() {
    let mut controller = PhaseController::new(RecordingOutput::default());

    advance(&mut controller);
    assert_eq!(controller.direction(), Direction::Forward, "leaving red");
    advance(&mut controller);
    assert_eq!(controller.direction(), Direction::Forward, "reached green");
    advance(&mut controller);
    assert_eq!(controller.direction(), Direction::Backward, "leaving green");
    advance(&mut controller);
    assert_eq!(controller.direction(), Direction::Backward, "reached red");
    advance(&mut controller);
    assert_eq!(controller.direction(), Direction::Forward, "leaving red again");
}

#[test]
fn every_write_encodes_exactly_one_phase() {
    let mut controller = PhaseController::new(RecordingOutput::default());
    for _ in 0..6 {
        advance(&mut controller);
    }

    let writes = &controller.output().writes;
    assert_eq!(writes.len(), 7, "boot write plus one per tick");
    assert_eq!(writes[0], Phase::Red.indicators());
    for pair in writes {
        assert!(pair.phase().is_some(), "indicators {pair} are dark");
    }
    assert_eq!(writes[2], IndicatorPair::new(false, true));
    assert_eq!(writes[3], IndicatorPair::new(true, true));
}
