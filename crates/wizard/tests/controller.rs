mod common;

use std::time::Duration;

use assert_matches::assert_matches;

use atelier_core::catalog::{self, find_option};
use atelier_core::category::{Category, KidsGender, UploadType};
use atelier_core::config_store::ConfigPatch;
use atelier_core::services::ServiceError;
use atelier_core::wizard::{KeyCombo, WizardStep};
use atelier_wizard::{
    GenerationOutcome, GenerationStatus, Page, WizardController, WizardError,
};

use common::{image, output, ready_men_controller, BackendReply, Harness, HostEvent};

fn assert_styling_fits(wizard: &WizardController) {
    let config = wizard.config();
    let hair = catalog::hair_styles_for(wizard.category(), wizard.selection().catalog_gender());
    let body = catalog::body_types_for(wizard.category());
    assert!(
        hair.iter().any(|e| e.id == config.hair_style.id),
        "hair style {} is outside the {} catalog",
        config.hair_style.id,
        wizard.category()
    );
    assert!(
        body.iter().any(|e| e.id == config.body_type.id),
        "body type {} is outside the {} catalog",
        config.body_type.id,
        wizard.category()
    );
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn next_is_gated_by_product_completion() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Men);

    assert!(!wizard.can_proceed());
    assert_matches!(wizard.next(), Err(WizardError::Validation(_)));
    assert_eq!(wizard.step(), WizardStep::Product);

    wizard.set_product_image(0, image("top")).unwrap();
    assert!(wizard.shows_bottom_selector());
    assert!(wizard.next().is_err());

    wizard.set_bottom_type(Some("men-beige-chinos")).unwrap();
    assert_eq!(wizard.next().unwrap(), WizardStep::Model);
    assert_eq!(wizard.next().unwrap(), WizardStep::Environment);
    assert!(wizard.next().is_err());
}

#[test]
fn back_and_jump_only_move_backwards() {
    let harness = Harness::new();
    let mut wizard = ready_men_controller(&harness);

    assert!(wizard.jump_to(WizardStep::Environment).is_err());
    wizard.jump_to(WizardStep::Product).unwrap();
    assert!(wizard.back().is_err());
    assert!(wizard.jump_to(WizardStep::Model).is_err());
}

// ---------------------------------------------------------------------------
// Category changes
// ---------------------------------------------------------------------------

#[test]
fn category_switch_resets_bottom_type_and_styling() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Men);
    wizard.set_product_image(0, image("top")).unwrap();
    wizard.set_bottom_type(Some("men-blue-jeans")).unwrap();
    wizard
        .update_config(&ConfigPatch {
            hair_style: Some(&catalog::HAIR_STYLES_MEN[1]),
            ..Default::default()
        })
        .unwrap();

    wizard.set_category(Category::Women).unwrap();

    assert!(wizard.selection().bottom_type().is_none());
    assert_eq!(wizard.config().hair_style, &catalog::HAIR_STYLES_WOMEN[0]);
    assert_eq!(wizard.config().body_type, &catalog::BODY_TYPES_WOMEN[0]);
    assert_eq!(wizard.selection().occupancy(), vec![false, false]);
    assert_eq!(wizard.step(), WizardStep::Product);
}

#[test]
fn category_switch_keeps_styling_from_shared_catalogs() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Women);
    let curly = &catalog::HAIR_STYLES_WOMEN[2];
    wizard
        .update_config(&ConfigPatch {
            hair_style: Some(curly),
            ..Default::default()
        })
        .unwrap();

    wizard.set_category(Category::Jewellery).unwrap();
    assert_eq!(wizard.config().hair_style, curly);
}

#[test]
fn undo_after_kids_gender_change_keeps_hair_in_gender_catalog() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Kids);
    assert_eq!(wizard.config().hair_style.id, "boy-short");
    wizard
        .update_config(&ConfigPatch {
            pose: find_option(catalog::POSES, "walking"),
            ..Default::default()
        })
        .unwrap();

    wizard.set_kids_gender(KidsGender::Girl).unwrap();
    assert_eq!(wizard.config().hair_style.id, "girl-pigtails");

    assert!(wizard.undo());
    assert_eq!(wizard.config().pose.id, "standing-front");
    assert_eq!(wizard.selection().kids_gender(), Some(KidsGender::Girl));
    assert_styling_fits(&wizard);

    assert!(wizard.redo());
    assert_eq!(wizard.config().pose.id, "walking");
    assert_styling_fits(&wizard);
}

#[test]
fn category_switch_starts_a_fresh_option_history() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Men);
    wizard
        .update_config(&ConfigPatch {
            hair_style: Some(&catalog::HAIR_STYLES_MEN[1]),
            pose: find_option(catalog::POSES, "seated"),
            ..Default::default()
        })
        .unwrap();

    wizard.set_category(Category::Kids).unwrap();
    assert!(!wizard.can_undo());
    assert!(!wizard.undo());
    assert_eq!(wizard.config().pose.id, "seated");
    assert_styling_fits(&wizard);

    wizard.set_product_image(0, image("top")).unwrap();
    wizard.set_product_image(1, image("shorts")).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    let ticket = wizard.begin_generation().unwrap();
    assert_eq!(
        ticket.request.hair_style.as_deref(),
        Some(catalog::HAIR_STYLES_KIDS_BOY[0].prompt)
    );
}

#[test]
fn reset_config_realigns_styling_for_current_gender() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Kids);
    wizard.set_kids_gender(KidsGender::Girl).unwrap();
    wizard.reset_config().unwrap();
    assert_eq!(wizard.config().hair_style.id, "girl-pigtails");
    assert_styling_fits(&wizard);
}

#[test]
fn foreign_hair_style_is_rejected() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Men);
    let err = wizard
        .update_config(&ConfigPatch {
            hair_style: Some(&catalog::HAIR_STYLES_KIDS_GIRL[0]),
            ..Default::default()
        })
        .unwrap_err();
    assert_matches!(err, WizardError::Validation(_));
    assert!(!wizard.can_undo());
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_generation_updates_credits_then_navigates() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Output(output(2, Some(18))));
    let mut wizard = ready_men_controller(&harness);

    let outcome = wizard.generate().await.unwrap();
    assert_matches!(outcome, GenerationOutcome::Completed(out) if out.credits_used == 2);

    assert_eq!(
        harness.host.events(),
        vec![HostEvent::Credits(18), HostEvent::Navigate(Page::Gallery)]
    );
    assert_eq!(wizard.credits(), Some(18));
    assert_eq!(wizard.step(), WizardStep::Product);
    assert_eq!(wizard.category(), Category::Men);
    assert!(wizard.selection().bottom_type().is_none());
    assert_eq!(wizard.selection().occupancy(), vec![false, false]);

    let request = &harness.backend.requests.lock().unwrap()[0];
    assert_eq!(request.bottom_type.as_deref(), Some("classic blue denim jeans"));
}

#[tokio::test]
async fn missing_remaining_balance_is_derived_from_known_credits() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Output(output(3, None)));
    let mut wizard = ready_men_controller(&harness);
    wizard.apply_credit_balance(10);

    wizard.generate().await.unwrap();
    assert_eq!(wizard.credits(), Some(7));
}

#[tokio::test]
async fn selection_reset_after_success_realigns_kids_styling() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Output(output(1, Some(9))));
    let mut wizard = harness.controller(Category::Kids);
    wizard.set_kids_gender(KidsGender::Girl).unwrap();
    wizard.set_upload_type(UploadType::Full).unwrap();
    wizard.set_product_image(0, image("dress")).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();

    wizard.generate().await.unwrap();
    assert_eq!(wizard.selection().kids_gender(), Some(KidsGender::Boy));
    assert_styling_fits(&wizard);
}

#[test]
fn generation_requires_terminal_step() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Jewellery);
    wizard.set_product_image(0, image("ring")).unwrap();
    assert_matches!(wizard.begin_generation(), Err(WizardError::Validation(_)));
    assert_eq!(harness.backend.request_count(), 0);
}

#[test]
fn incomplete_product_step_blocks_generation() {
    let harness = Harness::new();
    let mut wizard = ready_men_controller(&harness);
    // Custom model switched on after the product step, without its image.
    wizard.set_use_custom_model(true).unwrap();

    assert_matches!(wizard.begin_generation(), Err(WizardError::Validation(_)));
    assert!(wizard.error().is_some());
    assert!(!wizard.is_generating());
}

#[tokio::test]
async fn cancel_discards_late_result_and_leaves_state_interactive() {
    let harness = Harness::new();
    let mut wizard = ready_men_controller(&harness);
    wizard.apply_credit_balance(5);

    let ticket = wizard.begin_generation().unwrap();
    assert!(wizard.is_generating());
    assert!(wizard.next().is_err());
    assert!(wizard.set_category(Category::Kids).is_err());

    assert!(wizard.cancel_generation());
    assert!(ticket.cancel.is_cancelled());
    assert_eq!(wizard.status(), GenerationStatus::Idle);
    assert_eq!(wizard.step(), WizardStep::Environment);

    // The backend finished anyway; its result must not land.
    let attempt = ticket.execute(harness.backend.as_ref()).await;
    assert!(attempt.result.is_ok());
    assert_eq!(
        wizard.complete_generation(attempt).unwrap(),
        GenerationOutcome::Discarded
    );

    assert_eq!(wizard.credits(), Some(5));
    assert!(wizard.error().is_none());
    assert!(wizard.warning().is_none());
    assert!(wizard.selection().bottom_type().is_some());
    assert_eq!(harness.host.events(), vec![HostEvent::Credits(5)]);
}

#[test]
fn option_changes_are_rejected_while_generating() {
    let harness = Harness::new();
    let mut wizard = ready_men_controller(&harness);
    wizard
        .update_config(&ConfigPatch {
            pose: find_option(catalog::POSES, "walking"),
            ..Default::default()
        })
        .unwrap();

    let _ticket = wizard.begin_generation().unwrap();
    let err = wizard
        .update_config(&ConfigPatch {
            pose: find_option(catalog::POSES, "seated"),
            ..Default::default()
        })
        .unwrap_err();
    assert_matches!(err, WizardError::Validation(_));
    assert_matches!(wizard.reset_config(), Err(WizardError::Validation(_)));
    assert!(!wizard.undo());
    assert_eq!(wizard.config().pose.id, "walking");
}

#[tokio::test]
async fn success_reported_after_cancel_is_not_applied() {
    let harness = Harness::new();
    harness
        .backend
        .push(BackendReply::OutputAfter(Duration::from_millis(80), output(3, Some(2))));
    let mut wizard = ready_men_controller(&harness);
    wizard.apply_credit_balance(5);
    let handle = wizard.cancel_handle();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel()
    });

    let result = wizard.generate().await;
    assert_eq!(result, Err(WizardError::Cancelled));
    assert!(canceller.await.unwrap());

    assert!(!wizard.is_generating());
    assert_eq!(wizard.credits(), Some(5));
    assert_eq!(wizard.step(), WizardStep::Environment);
    assert!(wizard.selection().bottom_type().is_some());
    assert!(wizard.error().is_none());
    assert_eq!(harness.host.events(), vec![HostEvent::Credits(5)]);
}

#[tokio::test]
async fn cancel_handle_interrupts_running_generation() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::WaitForCancel);
    let mut wizard = ready_men_controller(&harness);
    let handle = wizard.cancel_handle();
    assert!(!handle.cancel());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel()
    });

    let result = tokio::time::timeout(Duration::from_secs(2), wizard.generate())
        .await
        .expect("generation should stop once cancelled");
    assert_eq!(result, Err(WizardError::Cancelled));
    assert!(canceller.await.unwrap());

    assert!(!wizard.is_generating());
    assert_eq!(wizard.step(), WizardStep::Environment);
    assert!(wizard.error().is_none());
    assert!(harness.host.events().is_empty());
}

#[tokio::test]
async fn session_cancellation_reaches_in_flight_attempt() {
    let harness = Harness::new();
    let session = tokio_util::sync::CancellationToken::new();
    let mut wizard =
        WizardController::with_session(Category::Jewellery, harness.services(None), session.clone());
    wizard.set_product_image(0, image("ring")).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();

    let ticket = wizard.begin_generation().unwrap();
    session.cancel();
    assert!(ticket.cancel.is_cancelled());
}

#[tokio::test]
async fn stale_epoch_after_retry_is_ignored() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Output(output(1, Some(40))));
    harness.backend.push(BackendReply::Output(output(1, Some(39))));
    let mut wizard = ready_men_controller(&harness);

    let first = wizard.begin_generation().unwrap();
    wizard.cancel_generation();
    let second = wizard.begin_generation().unwrap();
    assert!(second.epoch > first.epoch);

    let late = first.execute(harness.backend.as_ref()).await;
    assert_eq!(
        wizard.complete_generation(late).unwrap(),
        GenerationOutcome::Discarded
    );
    assert!(wizard.is_generating());

    let current = second.execute(harness.backend.as_ref()).await;
    assert_matches!(
        wizard.complete_generation(current),
        Ok(GenerationOutcome::Completed(_))
    );
    assert_eq!(wizard.credits(), Some(39));
}

#[tokio::test]
async fn insufficient_credits_warns_and_opens_pricing() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Error(ServiceError::Status {
        status: 402,
        message: "Not enough credits".into(),
    }));
    let mut wizard = ready_men_controller(&harness);

    let err = wizard.generate().await.unwrap_err();
    assert_eq!(err, WizardError::AccessDenied("Not enough credits".into()));
    assert_eq!(wizard.warning(), Some("Not enough credits"));
    assert!(wizard.error().is_none());
    assert_eq!(harness.host.events(), vec![HostEvent::Navigate(Page::Pricing)]);
    // Nothing else is cleared.
    assert_eq!(wizard.step(), WizardStep::Environment);
    assert!(wizard.selection().bottom_type().is_some());
}

#[tokio::test]
async fn expired_session_notifies_host_and_opens_login() {
    let harness = Harness::new();
    harness.backend.push(BackendReply::Error(ServiceError::Status {
        status: 401,
        message: "Unauthorized".into(),
    }));
    let mut wizard = ready_men_controller(&harness);

    assert_eq!(wizard.generate().await, Err(WizardError::SessionExpired));
    assert_eq!(
        harness.host.events(),
        vec![HostEvent::SessionExpired, HostEvent::Navigate(Page::Login)]
    );
}

#[tokio::test]
async fn transport_failure_sets_generic_error_and_stays() {
    let harness = Harness::new();
    harness
        .backend
        .push(BackendReply::Error(ServiceError::Transport("reset".into())));
    let mut wizard = ready_men_controller(&harness);

    assert_matches!(wizard.generate().await, Err(WizardError::Transport(_)));
    assert_eq!(wizard.error(), Some(atelier_wizard::controller::GENERIC_ERROR));
    assert_eq!(wizard.step(), WizardStep::Environment);
    assert!(harness.host.events().is_empty());

    // Retrying clears the banner.
    wizard.generate().await.unwrap();
    assert!(wizard.error().is_none());
}

#[test]
fn accelerator_only_on_environment_when_idle() {
    let harness = Harness::new();
    let confirm = KeyCombo {
        key: "Enter".into(),
        meta: true,
        ..Default::default()
    };

    let mut wizard = harness.controller(Category::Men);
    assert!(!wizard.accelerator_triggers_generation(&confirm));

    wizard = ready_men_controller(&harness);
    assert!(wizard.accelerator_triggers_generation(&confirm));
    let _ticket = wizard.begin_generation().unwrap();
    assert!(!wizard.accelerator_triggers_generation(&confirm));
}

#[test]
fn full_upload_generation_sends_single_image() {
    let harness = Harness::new();
    let mut wizard = harness.controller(Category::Women);
    wizard.set_upload_type(UploadType::Full).unwrap();
    wizard.set_product_image(0, image("look")).unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();

    let ticket = wizard.begin_generation().unwrap();
    assert_eq!(ticket.request.images.len(), 1);
    assert!(ticket.request.bottom_type.is_none());
    assert_eq!(
        ticket.request.pose_prompt,
        find_option(catalog::POSES, "standing-front").unwrap().prompt
    );
}
