use pretty_assertions::assert_eq;

use ebb_exec::PathError;
use ebb_sym::{ProgPoint, Span, Symbol};

use super::{AllocMap, RefState};

fn s(n: u32) -> Symbol {
    Symbol::from_raw(n)
}

fn p(n: u32) -> ProgPoint {
    ProgPoint::new(n, Span::new(n, n + 1))
}

#[test]
fn only_allocated_unchecked_is_owned() {
    assert!(RefState::AllocatedUnchecked(p(1)).is_allocated());
    assert!(!RefState::AllocationFailed.is_allocated());
    assert!(!RefState::Released(p(1)).is_allocated());
    assert!(!RefState::Relinquished(p(1)).is_allocated());
    assert!(!RefState::Escaped(p(1)).is_allocated());
}

#[test]
fn ref_state_equality_includes_the_point() {
    assert_eq!(RefState::Released(p(1)), RefState::Released(p(1)));
    assert_ne!(RefState::Released(p(1)), RefState::Released(p(2)));
    assert_ne!(
        RefState::Released(p(1)),
        RefState::AllocatedUnchecked(p(1))
    );
}

#[test]
fn enter_transition_remove_round_trip() {
    let map = AllocMap::new();
    assert!(map.is_empty());

    let map = map.enter(s(1), RefState::AllocatedUnchecked(p(1))).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(s(1)), Some(&RefState::AllocatedUnchecked(p(1))));

    let map = map.transition(s(1), RefState::Released(p(2))).unwrap();
    assert_eq!(map.get(s(1)), Some(&RefState::Released(p(2))));

    let map = map.remove(s(1)).unwrap();
    assert!(map.is_empty());
}

#[test]
fn entering_twice_is_a_contract_violation() {
    let map = AllocMap::new()
        .enter(s(1), RefState::AllocatedUnchecked(p(1)))
        .unwrap();
    assert_eq!(
        map.enter(s(1), RefState::AllocatedUnchecked(p(2))),
        Err(PathError::SymbolAlreadyTracked(s(1)))
    );
}

#[test]
fn touching_untracked_symbols_is_a_contract_violation() {
    let map = AllocMap::new();
    assert_eq!(
        map.transition(s(7), RefState::Released(p(1))),
        Err(PathError::SymbolNotTracked(s(7)))
    );
    assert_eq!(map.remove(s(7)), Err(PathError::SymbolNotTracked(s(7))));
}

#[test]
fn updates_share_structure_with_the_parent_map() {
    let base = AllocMap::new()
        .enter(s(1), RefState::AllocatedUnchecked(p(1)))
        .unwrap()
        .enter(s(2), RefState::AllocatedUnchecked(p(2)))
        .unwrap();

    let released = base.transition(s(1), RefState::Released(p(3))).unwrap();

    // The fork sees the update; the parent does not.
    assert_eq!(released.get(s(1)), Some(&RefState::Released(p(3))));
    assert_eq!(base.get(s(1)), Some(&RefState::AllocatedUnchecked(p(1))));
    // Untouched entries read the same through both.
    assert_eq!(base.get(s(2)), released.get(s(2)));
}
