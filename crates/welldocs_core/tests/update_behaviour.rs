use std::sync::Once;

use pretty_assertions::assert_eq;
use welldocs_core::{
    update, Advance, NextControl, PageEffect, PageMsg, PageSnapshot, PaginationState, StopReason,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

fn snapshot(ids: &[&str]) -> PageSnapshot {
    ids.iter().copied().collect()
}

fn extracted(state: PaginationState, ids: &[&str]) -> (PaginationState, Vec<PageEffect>) {
    update(
        state,
        PageMsg::PageExtracted {
            snapshot: snapshot(ids),
        },
    )
}

#[test]
fn start_requests_first_extraction() {
    init_logging();
    let (state, effects) = update(PaginationState::new(25), PageMsg::Start);

    assert_eq!(effects, vec![PageEffect::ExtractPage]);
    assert_eq!(state.page(), 1);
}

#[test]
fn disabled_next_control_processes_exactly_one_page() {
    init_logging();
    let (state, _) = update(PaginationState::new(25), PageMsg::Start);
    let (state, effects) = extracted(state, &["A", "B"]);
    assert_eq!(effects, vec![PageEffect::InspectNext]);

    let (state, effects) = update(state, PageMsg::NextControl(NextControl::Disabled));
    assert_eq!(effects, vec![PageEffect::Stop(StopReason::NextDisabled)]);
    assert_eq!(state.pages_extracted(), 1);
    assert!(state.is_stopped());
}

#[test]
fn missing_next_control_stops() {
    init_logging();
    let (state, _) = extracted(PaginationState::new(25), &["A"]);
    let (_, effects) = update(state, PageMsg::NextControl(NextControl::Missing));

    assert_eq!(effects, vec![PageEffect::Stop(StopReason::NoNextControl)]);
}

#[test]
fn enabled_next_control_advances_to_next_page() {
    init_logging();
    let (state, _) = extracted(PaginationState::new(25), &["A"]);
    let (state, effects) = update(state, PageMsg::NextControl(NextControl::Enabled));
    assert_eq!(effects, vec![PageEffect::Advance]);

    let (state, effects) = update(state, PageMsg::AdvanceFinished(Advance::Advanced));
    assert_eq!(effects, vec![PageEffect::ExtractPage]);
    assert_eq!(state.page(), 2);
}

#[test]
fn duplicate_consecutive_pages_stop_before_a_third_page() {
    init_logging();
    let (state, _) = extracted(PaginationState::new(25), &["A", "B"]);
    let (state, _) = update(state, PageMsg::NextControl(NextControl::Enabled));
    let (state, _) = update(state, PageMsg::AdvanceFinished(Advance::Advanced));

    let (state, effects) = extracted(state, &["B", "A"]);

    assert_eq!(
        effects,
        vec![PageEffect::Stop(StopReason::DuplicatePage { page: 2 })]
    );
    assert_eq!(state.page(), 2);
    assert_eq!(state.pages_extracted(), 2);
}

#[test]
fn identical_first_page_is_not_a_duplicate() {
    init_logging();
    let (_, effects) = extracted(PaginationState::new(25), &[]);

    assert_eq!(effects, vec![PageEffect::InspectNext]);
}

#[test]
fn max_pages_bounds_the_scan() {
    init_logging();
    let mut state = PaginationState::new(3);
    let mut pages = 0;
    let mut last = Vec::new();

    for page in 1..=10 {
        let id = format!("doc-{page}");
        let (next, effects) = extracted(state, &[id.as_str()]);
        pages += 1;
        state = next;
        if matches!(effects.as_slice(), [PageEffect::Stop(_)]) {
            last = effects;
            break;
        }
        let (next, _) = update(state, PageMsg::NextControl(NextControl::Enabled));
        let (next, _) = update(next, PageMsg::AdvanceFinished(Advance::Advanced));
        state = next;
    }

    assert_eq!(pages, 3);
    assert_eq!(
        last,
        vec![PageEffect::Stop(StopReason::MaxPagesReached { max_pages: 3 })]
    );
}

#[test]
fn single_page_limit_never_inspects_next() {
    init_logging();
    let (_, effects) = extracted(PaginationState::new(1), &["A"]);

    assert_eq!(
        effects,
        vec![PageEffect::Stop(StopReason::MaxPagesReached { max_pages: 1 })]
    );
}

#[test]
fn missing_table_is_a_failure_stop() {
    init_logging();
    let (state, effects) = update(PaginationState::new(25), PageMsg::TableMissing);

    assert_eq!(
        effects,
        vec![PageEffect::Stop(StopReason::NoTable { page: 1 })]
    );
    assert!(state.stop_reason().is_some_and(StopReason::is_failure));
}

#[test]
fn stopped_advance_propagates_reason() {
    init_logging();
    let (state, _) = extracted(PaginationState::new(25), &["A"]);
    let (state, _) = update(state, PageMsg::NextControl(NextControl::Enabled));
    let (state, effects) = update(
        state,
        PageMsg::AdvanceFinished(Advance::Stopped(StopReason::ClickHadNoEffect { page: 1 })),
    );

    assert_eq!(
        effects,
        vec![PageEffect::Stop(StopReason::ClickHadNoEffect { page: 1 })]
    );
    assert_eq!(state.page(), 1);
}
