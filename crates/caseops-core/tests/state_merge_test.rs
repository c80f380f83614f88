use caseops_core::bulk::BulkAction;
use caseops_core::state::{BulkDraft, PanelPatch, PanelSlot, PanelState, SlotUpdate};
use proptest::prelude::*;

type Slot = PanelSlot<u32, BulkDraft>;

fn draft_strategy() -> impl Strategy<Value = BulkDraft> {
    (
        prop::option::of(prop::sample::select(BulkAction::ALL.to_vec())),
        "[A-Z0-9\n-]{0,20}",
    )
        .prop_map(|(action, document_text)| BulkDraft {
            action,
            document_text,
        })
}

fn state_strategy() -> impl Strategy<Value = PanelState<u32, BulkDraft>> {
    (
        any::<bool>(),
        prop::option::of(any::<u32>()),
        prop::option::of("[a-z ]{1,12}"),
        draft_strategy(),
    )
        .prop_map(|(loading, result, error, draft)| PanelState {
            loading,
            result,
            error,
            draft,
        })
}

fn patch_strategy() -> impl Strategy<Value = PanelPatch<u32, BulkDraft>> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(prop::option::of(any::<u32>())),
        prop::option::of(prop::option::of("[a-z ]{1,12}")),
        prop::option::of(draft_strategy()),
    )
        .prop_map(|(loading, result, error, draft)| PanelPatch {
            loading,
            result,
            error,
            draft,
        })
}

proptest! {
    #[test]
    fn merge_preserves_unspecified_fields(start in state_strategy(), patch in patch_strategy()) {
        let mut slot = Slot::default();
        slot.replace(start.clone());
        let expected_patch = patch.clone();
        slot.update(SlotUpdate::merge(move |_| patch));
        let after = slot.state();

        prop_assert_eq!(after.loading, expected_patch.loading.unwrap_or(start.loading));
        prop_assert_eq!(&after.result, expected_patch.result.as_ref().unwrap_or(&start.result));
        prop_assert_eq!(&after.error, expected_patch.error.as_ref().unwrap_or(&start.error));
        prop_assert_eq!(&after.draft, expected_patch.draft.as_ref().unwrap_or(&start.draft));
    }

    #[test]
    fn repeated_success_is_idempotent(start in state_strategy(), value in any::<u32>()) {
        let mut slot = Slot::default();
        slot.replace(start);
        slot.merge(PanelPatch::success(value));
        let once = slot.snapshot();
        slot.merge(PanelPatch::success(value));
        prop_assert_eq!(slot.snapshot(), once);
    }

    #[test]
    fn lifecycle_writes_keep_result_and_error_exclusive(
        start_draft in draft_strategy(),
        outcomes in prop::collection::vec(prop::option::of(any::<u32>()), 1..8),
    ) {
        let mut slot = Slot::default();
        slot.merge(PanelPatch::new().draft(start_draft.clone()));
        for outcome in outcomes {
            slot.merge(PanelPatch::dispatch_start());
            prop_assert!(slot.state().is_consistent());
            match outcome {
                Some(value) => slot.merge(PanelPatch::success(value)),
                None => slot.merge(PanelPatch::failure("Failed to process cases")),
            }
            prop_assert!(slot.state().is_consistent());
            prop_assert!(!slot.state().loading);
            prop_assert_eq!(&slot.state().draft, &start_draft);
        }
    }
}
