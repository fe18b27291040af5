use crate::{Advance, NextControl, PageEffect, PageMsg, PaginationState, StopReason};

/// Pure update function: applies a pagination message and returns the next effects.
///
/// Once a stop effect has been emitted every later message is ignored.
pub fn update(mut state: PaginationState, msg: PageMsg) -> (PaginationState, Vec<PageEffect>) {
    if state.is_stopped() {
        return (state, Vec::new());
    }

    let effects = match msg {
        PageMsg::Start => {
            if state.pages_extracted() == 0 {
                vec![PageEffect::ExtractPage]
            } else {
                Vec::new()
            }
        }
        PageMsg::TableMissing => {
            let page = state.page();
            vec![PageEffect::Stop(state.stop(StopReason::NoTable { page }))]
        }
        PageMsg::TableUnparsable => {
            let page = state.page();
            vec![PageEffect::Stop(state.stop(StopReason::TableUnparsable { page }))]
        }
        PageMsg::PageExtracted { snapshot } => {
            state.count_extraction();
            let page = state.page();
            if page > 1 && state.previous() == Some(&snapshot) {
                vec![PageEffect::Stop(state.stop(StopReason::DuplicatePage { page }))]
            } else {
                state.record_page(snapshot);
                if page >= state.max_pages() {
                    let max_pages = state.max_pages();
                    vec![PageEffect::Stop(
                        state.stop(StopReason::MaxPagesReached { max_pages }),
                    )]
                } else {
                    vec![PageEffect::InspectNext]
                }
            }
        }
        PageMsg::NextControl(NextControl::Missing) => {
            vec![PageEffect::Stop(state.stop(StopReason::NoNextControl))]
        }
        PageMsg::NextControl(NextControl::Disabled) => {
            vec![PageEffect::Stop(state.stop(StopReason::NextDisabled))]
        }
        PageMsg::NextControl(NextControl::Enabled) => vec![PageEffect::Advance],
        PageMsg::AdvanceFinished(Advance::Advanced) => {
            state.next_page();
            vec![PageEffect::ExtractPage]
        }
        PageMsg::AdvanceFinished(Advance::Stopped(reason)) => {
            vec![PageEffect::Stop(state.stop(reason))]
        }
    };

    (state, effects)
}
