use super::*;

fn demonstrate(c: &mut EscalationController, total: usize) {
    c.set_demonstration_total(total);
    let steps = c.tick(800 * total as u64);
    assert_eq!(steps, (1..=total).collect::<Vec<_>>());
    assert!(c.demonstration_finished());
}

#[test]
fn escalates_flash_hint_demonstration_then_stays_normal() {
    let mut c = EscalationController::default();

    assert_eq!(c.on_incorrect(), Remedy::Flash);
    assert_eq!(c.phase(), EscalationPhase::Normal);

    assert_eq!(c.on_incorrect(), Remedy::Hint);
    assert_eq!(c.phase(), EscalationPhase::Hint);
    assert!(c.blocks_input());
    assert!(c.dismiss_hint());
    assert_eq!(c.phase(), EscalationPhase::Normal);
    assert_eq!(c.attempts(), 2);

    assert_eq!(c.on_incorrect(), Remedy::Demonstration);
    assert_eq!(c.phase(), EscalationPhase::Demonstration);
    demonstrate(&mut c, 4);
    assert!(c.dismiss_demonstration());
    assert!(c.post_demonstration());
    assert_eq!(c.phase(), EscalationPhase::Normal);

    for _ in 0..5 {
        assert_eq!(c.on_incorrect(), Remedy::Flash);
        assert_eq!(c.phase(), EscalationPhase::Normal);
    }
    assert_eq!(c.attempts(), 8);
}

#[test]
fn demonstration_cannot_be_dismissed_early() {
    let mut c = EscalationController::default();
    for _ in 0..3 {
        c.on_incorrect();
        c.dismiss_hint();
    }
    assert_eq!(c.phase(), EscalationPhase::Demonstration);
    assert!(!c.dismiss_demonstration());

    c.set_demonstration_total(3);
    assert_eq!(c.tick(799), Vec::<usize>::new());
    assert_eq!(c.tick(1), vec![1]);
    assert_eq!(c.demonstration_cursor(), Some(1));
    assert!(!c.dismiss_demonstration());
    assert_eq!(c.tick(1600), vec![2, 3]);
    assert!(c.dismiss_demonstration());
}

#[test]
fn pending_total_holds_the_cursor() {
    let mut c = EscalationController::new(EscalationConfig {
        hint_after: 1,
        demonstrate_after: 1,
        ..EscalationConfig::default()
    });
    assert_eq!(c.on_incorrect(), Remedy::Demonstration);
    assert!(c.tick(5_000).is_empty());
    assert_eq!(c.demonstration_cursor(), Some(0));
    assert_eq!(c.demonstration_total(), None);

    c.set_demonstration_total(0);
    assert!(c.demonstration_finished());
    assert!(c.dismiss_demonstration());
}

#[test]
fn correct_judgment_resets_from_any_phase() {
    let mut c = EscalationController::default();
    c.on_incorrect();
    c.on_incorrect();
    assert_eq!(c.phase(), EscalationPhase::Hint);
    c.on_correct();
    assert_eq!(c.attempts(), 0);
    assert_eq!(c.phase(), EscalationPhase::Normal);
    assert!(!c.post_demonstration());
}

#[test]
fn one_miss_then_correct_never_leaves_normal() {
    let mut c = EscalationController::default();
    assert_eq!(c.on_incorrect(), Remedy::Flash);
    assert_eq!(c.phase(), EscalationPhase::Normal);
    c.on_correct();
    assert_eq!(c.phase(), EscalationPhase::Normal);
    assert_eq!(c.attempts(), 0);
}

#[test]
fn dismissals_do_not_touch_the_counter() {
    let mut c = EscalationController::default();
    c.on_incorrect();
    assert!(!c.dismiss_hint());
    c.on_incorrect();
    assert!(c.dismiss_hint());
    assert!(!c.dismiss_hint());
    assert_eq!(c.attempts(), 2);
}

#[test]
fn config_validation() {
    assert!(EscalationConfig::default().validate().is_ok());
    let bad = EscalationConfig {
        demonstration_interval_ms: 0,
        ..EscalationConfig::default()
    };
    assert!(bad.validate().is_err());
    let bad = EscalationConfig {
        hint_after: 0,
        ..EscalationConfig::default()
    };
    assert!(bad.validate().is_err());
}
