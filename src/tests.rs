use std::cell::RefCell;
use std::rc::Rc;

use super::*;

const QUOTE_FORM_HTML: &str = r#"
<form id="quote-form">
  <div class="form-step">
    <label id="card-residential" class="radio-card border-gray-100">
      <input id="interest-residential" type="radio" name="interest_type" value="residential" required>
      Home
    </label>
    <label id="card-business" class="radio-card border-gray-100">
      <input id="interest-business" type="radio" name="interest_type" value="business" required>
      Business
    </label>
    <button type="button" id="next-0" class="btn-next">Next</button>
  </div>
  <div class="form-step">
    <div id="business-fields" class="hidden">
      <input id="company" name="company" required>
    </div>
    <div id="residential-fields" class="hidden">
      <select id="home-type" name="home_type" required>
        <option value="">Choose</option>
        <option value="house">House</option>
        <option value="flat">Flat</option>
      </select>
    </div>
    <button type="button" id="prev-1" class="btn-prev">Back</button>
    <button type="button" id="next-1" class="btn-next">Next</button>
  </div>
  <div class="form-step">
    <input id="name" name="name" required>
    <input id="email" name="email" type="email" required>
    <textarea id="notes" name="notes"></textarea>
    <input id="consent" name="consent" type="checkbox" required>
    <button type="button" id="prev-2" class="btn-prev">Back</button>
    <button type="submit" id="send">Send</button>
  </div>
</form>
<div id="progress-bar" style="width: 0%"></div>
"#;

fn quiet_wizard(html: &str) -> Result<QuoteWizard> {
    let mut wizard = QuoteWizard::from_html(html)?;
    wizard.set_trace_stderr(false);
    Ok(wizard)
}

fn width_for(position: usize, count: usize) -> String {
    format!("{}%", (position as f64 / count as f64) * 100.0)
}

#[derive(Clone, Default)]
struct RecordingSink(Rc<RefCell<Vec<SubmissionPayload>>>);

impl SubmissionSink for RecordingSink {
    fn deliver(&mut self, payload: &SubmissionPayload) {
        self.0.borrow_mut().push(payload.clone());
    }
}

fn fill_business_path(wizard: &mut QuoteWizard) -> Result<()> {
    wizard.click("#interest-business")?;
    wizard.click("#next-0")?;
    wizard.type_text("#company", "Acme Ltd")?;
    wizard.click("#next-1")?;
    wizard.type_text("#name", "Ada Lovelace")?;
    wizard.type_text("#email", "ada@example.com")?;
    wizard.set_checked("#consent", true)?;
    Ok(())
}

#[test]
fn first_step_is_rendered_on_construction() -> Result<()> {
    let wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.step_count(), 3);
    assert_eq!(wizard.visible_steps(), vec![0]);
    assert_eq!(wizard.progress_width(), Some(width_for(1, 3)));
    assert!(wizard.has_class(".form-step", "animate-fade-in-up")?);
    Ok(())
}

#[test]
fn next_is_blocked_until_the_interest_is_chosen() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;

    wizard.click("#next-0")?;
    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.visible_steps(), vec![0]);
    wizard.assert_has_class("#interest-residential", "border-red-500", true)?;
    wizard.assert_has_class("#interest-business", "ring-red-500", true)?;

    wizard.click("#interest-residential")?;
    wizard.click("#next-0")?;
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.visible_steps(), vec![1]);
    assert_eq!(wizard.progress_width(), Some(width_for(2, 3)));
    wizard.assert_has_class("#interest-residential", "border-red-500", false)?;
    wizard.assert_has_class("#interest-business", "ring-1", false)?;
    Ok(())
}

#[test]
fn interest_choice_toggles_conditional_sections() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;

    wizard.click("#interest-business")?;
    wizard.assert_has_class("#business-fields", "hidden", false)?;
    wizard.assert_has_class("#residential-fields", "hidden", true)?;

    wizard.click("#interest-residential")?;
    wizard.assert_has_class("#business-fields", "hidden", true)?;
    wizard.assert_has_class("#residential-fields", "hidden", false)?;
    wizard.assert_checked("#interest-business", false)?;
    Ok(())
}

#[test]
fn radio_cards_are_highlighted_exclusively() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;

    wizard.click("#interest-business")?;
    for class_name in ["ring-2", "ring-brand-primary", "bg-brand-primary/5", "border-brand-primary"] {
        wizard.assert_has_class("#card-business", class_name, true)?;
        wizard.assert_has_class("#card-residential", class_name, false)?;
    }
    wizard.assert_has_class("#card-business", "border-gray-100", false)?;
    wizard.assert_has_class("#card-residential", "border-gray-100", true)?;

    wizard.click("#interest-residential")?;
    wizard.assert_has_class("#card-residential", "ring-2", true)?;
    wizard.assert_has_class("#card-business", "ring-2", false)?;
    wizard.assert_has_class("#card-business", "border-gray-100", true)?;
    Ok(())
}

#[test]
fn fields_in_hidden_sections_are_not_validated() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.click("#interest-business")?;
    wizard.click("#next-0")?;

    wizard.click("#next-1")?;
    assert_eq!(wizard.current_step(), 1);
    wizard.assert_has_class("#company", "border-red-500", true)?;
    wizard.assert_has_class("#home-type", "border-red-500", false)?;

    wizard.type_text("#company", "Acme Ltd")?;
    wizard.click("#next-1")?;
    assert_eq!(wizard.current_step(), 2);
    assert_eq!(wizard.progress_width().as_deref(), Some("100%"));
    wizard.assert_has_class("#company", "border-red-500", false)?;
    Ok(())
}

#[test]
fn select_must_leave_its_placeholder() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.click("#interest-residential")?;
    wizard.click("#next-0")?;

    wizard.click("#next-1")?;
    assert_eq!(wizard.current_step(), 1);
    wizard.assert_has_class("#home-type", "ring-red-500", true)?;

    wizard.select_option("#home-type", "flat")?;
    wizard.assert_value("#home-type", "flat")?;
    wizard.click("#next-1")?;
    assert_eq!(wizard.current_step(), 2);
    Ok(())
}

#[test]
fn previous_never_validates_and_stops_at_the_first_step() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.click("#interest-business")?;
    wizard.click("#next-0")?;

    wizard.click("#prev-1")?;
    assert_eq!(wizard.current_step(), 0);
    wizard.assert_has_class("#company", "border-red-500", false)?;

    assert!(!wizard.retreat()?);
    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.visible_steps(), vec![0]);
    assert_eq!(wizard.progress_width(), Some(width_for(1, 3)));
    Ok(())
}

#[test]
fn advance_stays_on_the_last_step() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    fill_business_path(&mut wizard)?;
    assert_eq!(wizard.current_step(), 2);

    assert!(!wizard.advance()?);
    assert_eq!(wizard.current_step(), 2);
    assert_eq!(wizard.visible_steps(), vec![2]);
    Ok(())
}

#[test]
fn render_is_idempotent() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.click("#interest-business")?;
    wizard.click("#next-0")?;

    wizard.render()?;
    let once = wizard.dump_dom("#quote-form")?;
    let bar_once = wizard.dump_dom("#progress-bar")?;
    wizard.render()?;
    assert_eq!(wizard.dump_dom("#quote-form")?, once);
    assert_eq!(wizard.dump_dom("#progress-bar")?, bar_once);
    assert_eq!(wizard.visible_steps(), vec![1]);
    Ok(())
}

#[test]
fn validate_rejects_out_of_range_steps() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    assert_eq!(
        wizard.validate(3),
        Err(Error::StepOutOfRange { index: 3, count: 3 })
    );
    assert!(!wizard.validate(0)?);
    Ok(())
}

#[test]
fn radio_group_is_satisfied_by_a_member_anywhere_in_the_document() -> Result<()> {
    let html = r#"
        <form id="quote-form">
          <div class="form-step">
            <input id="basic" type="radio" name="plan" value="basic" required>
            <button type="button" id="next" class="btn-next">Next</button>
          </div>
          <div class="form-step"><p>Done</p></div>
        </form>
        <input id="premium" type="radio" name="plan" value="premium">
    "#;
    let mut wizard = quiet_wizard(html)?;

    wizard.set_checked("#premium", true)?;
    wizard.assert_checked("#basic", false)?;
    wizard.click("#next")?;
    assert_eq!(wizard.current_step(), 1);
    Ok(())
}

#[test]
fn clicks_on_trigger_contents_bubble_to_the_trigger() -> Result<()> {
    let html = r#"
        <form id="quote-form">
          <div class="form-step">
            <button type="button" class="btn-next"><span id="label">Next</span></button>
          </div>
          <div class="form-step">
            <button type="button" class="btn-prev"><span id="back">Back</span></button>
          </div>
        </form>
    "#;
    let mut wizard = quiet_wizard(html)?;

    wizard.click("#label")?;
    assert_eq!(wizard.current_step(), 1);
    wizard.click("#back")?;
    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.progress_width(), None);
    Ok(())
}

#[test]
fn submission_is_blocked_while_the_current_step_is_invalid() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    fill_business_path(&mut wizard)?;
    wizard.set_checked("#consent", false)?;

    wizard.click("#send")?;
    assert!(wizard.take_submissions().is_empty());
    assert!(wizard.take_acknowledgments().is_empty());
    assert_eq!(wizard.current_step(), 2);
    wizard.assert_has_class("#consent", "border-red-500", true)?;
    wizard.assert_value("#name", "Ada Lovelace")?;
    Ok(())
}

#[test]
fn accepted_submission_delivers_acknowledges_and_resets() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    let sink = RecordingSink::default();
    wizard.set_submission_sink(sink.clone());
    fill_business_path(&mut wizard)?;
    wizard.type_text("#notes", "Roof faces south")?;

    wizard.click("#send")?;

    let delivered = sink.0.borrow().clone();
    assert_eq!(delivered.len(), 1);
    let payload = &delivered[0];
    assert_eq!(
        payload.iter().collect::<Vec<_>>(),
        vec![
            ("interest_type", "business"),
            ("company", "Acme Ltd"),
            ("home_type", ""),
            ("name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("notes", "Roof faces south"),
            ("consent", "on"),
        ]
    );
    assert_eq!(wizard.take_submissions(), delivered);
    assert_eq!(
        wizard.take_acknowledgments(),
        vec!["Thank you! Your quote request has been received. We will contact you shortly."]
    );

    assert_eq!(wizard.current_step(), 0);
    assert_eq!(wizard.visible_steps(), vec![0]);
    assert_eq!(wizard.progress_width(), Some(width_for(1, 3)));
    wizard.assert_value("#name", "")?;
    wizard.assert_value("#notes", "")?;
    wizard.assert_checked("#interest-business", false)?;
    wizard.assert_checked("#consent", false)?;
    wizard.assert_has_class("#card-business", "ring-2", false)?;
    wizard.assert_has_class("#card-business", "border-gray-100", true)?;
    Ok(())
}

#[test]
fn submit_on_an_earlier_step_only_checks_that_step() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.click("#interest-residential")?;

    wizard.submit("#quote-form")?;
    let submissions = wizard.take_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].get("interest_type"), Some("residential"));
    assert_eq!(submissions[0].get("name"), Some(""));
    assert_eq!(wizard.current_step(), 0);
    Ok(())
}

#[test]
fn reset_restores_markup_defaults_and_clears_every_card() -> Result<()> {
    let html = r#"
        <form id="quote-form">
          <div class="form-step">
            <label id="card-home" class="radio-card border-gray-100">
              <input id="home" type="radio" name="interest_type" value="residential" checked>
            </label>
            <label id="card-work" class="radio-card border-gray-100">
              <input id="work" type="radio" name="interest_type" value="business">
            </label>
            <div id="business-fields" class="hidden"></div>
            <div id="residential-fields" class="hidden"></div>
            <input id="city" name="city" value="Leeds">
            <textarea id="notes" name="notes">Call after 5pm</textarea>
            <button type="submit" id="send">Send</button>
          </div>
        </form>
    "#;
    let mut wizard = quiet_wizard(html)?;
    wizard.assert_has_class("#card-home", "ring-2", true)?;
    wizard.assert_has_class("#card-home", "border-gray-100", false)?;

    wizard.click("#card-work")?;
    wizard.type_text("#city", "York")?;
    wizard.type_text("#notes", "Any time")?;
    wizard.click("#send")?;

    assert_eq!(wizard.take_submissions()[0].get("city"), Some("York"));
    wizard.assert_checked("#home", true)?;
    wizard.assert_checked("#work", false)?;
    wizard.assert_value("#city", "Leeds")?;
    wizard.assert_value("#notes", "Call after 5pm")?;
    for card in ["#card-home", "#card-work"] {
        wizard.assert_has_class(card, "ring-2", false)?;
        wizard.assert_has_class(card, "border-gray-100", true)?;
    }
    // A reset fires no change, so the sections keep the last choice.
    wizard.assert_has_class("#business-fields", "hidden", false)?;
    wizard.assert_has_class("#residential-fields", "hidden", true)?;
    Ok(())
}

#[test]
fn clicking_a_card_selects_its_radio() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;

    wizard.click("#card-business")?;
    wizard.assert_checked("#interest-business", true)?;
    wizard.assert_has_class("#card-business", "ring-2", true)?;
    wizard.assert_has_class("#business-fields", "hidden", false)?;
    wizard.assert_has_class("#residential-fields", "hidden", true)?;

    wizard.click("#card-residential")?;
    wizard.assert_checked("#interest-business", false)?;
    wizard.assert_checked("#interest-residential", true)?;
    wizard.assert_has_class("#card-business", "ring-2", false)?;
    wizard.assert_has_class("#card-residential", "ring-2", true)?;
    wizard.assert_has_class("#residential-fields", "hidden", false)?;

    wizard.click("#next-0")?;
    assert_eq!(wizard.current_step(), 1);
    Ok(())
}

#[test]
fn labels_skip_disabled_controls() -> Result<()> {
    let html = r#"
        <form id="quote-form">
          <div class="form-step">
            <label id="card-off" class="radio-card border-gray-100">
              <input id="off" type="radio" name="interest_type" value="business" disabled>
            </label>
          </div>
        </form>
    "#;
    let mut wizard = quiet_wizard(html)?;
    wizard.click("#card-off")?;
    wizard.assert_checked("#off", false)?;
    wizard.assert_has_class("#card-off", "ring-2", false)?;
    Ok(())
}

#[test]
fn deeply_nested_markup_runs_on_a_small_stack() -> Result<()> {
    const DEPTH: usize = 50_000;
    let html = format!(
        "{}{QUOTE_FORM_HTML}{}",
        "<div class=\"shell\">".repeat(DEPTH),
        "</div>".repeat(DEPTH)
    );

    let worker = std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(move || -> Result<(usize, bool, usize)> {
            let mut wizard = quiet_wizard(&html)?;
            wizard.click("#card-business")?;
            wizard.assert_has_class("#business-fields", "hidden", false)?;
            let shells = wizard.dump_dom(".shell")?.matches("<div class=").count();
            Ok((wizard.step_count(), wizard.checked("#interest-business")?, shells))
        })
        .expect("spawn worker");
    let (steps, checked, shells) = worker.join().expect("worker finished")?;

    assert_eq!(steps, 3);
    assert!(checked);
    assert!(shells >= DEPTH);
    Ok(())
}

#[test]
fn roles_are_bound_from_the_structure() -> Result<()> {
    let wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    assert_eq!(
        wizard.roles_of("#interest-business")?,
        vec![ElementRole::InterestChoice, ElementRole::CardChoice]
    );
    assert_eq!(wizard.roles_of("#next-1")?, vec![ElementRole::NextTrigger]);
    assert_eq!(wizard.roles_of("#prev-2")?, vec![ElementRole::PrevTrigger]);
    assert_eq!(wizard.roles_of("#quote-form")?, vec![ElementRole::Form]);
    assert!(wizard.roles_of("#name")?.is_empty());
    Ok(())
}

#[test]
fn dispatching_change_without_a_checked_choice_changes_nothing() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.dispatch("#interest-business", EventKind::Change)?;
    wizard.assert_has_class("#business-fields", "hidden", true)?;
    wizard.assert_has_class("#card-business", "ring-2", false)?;
    Ok(())
}

#[test]
fn trace_records_events_and_validation() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    wizard.enable_trace(true);

    wizard.click("#next-0")?;
    let logs = wizard.take_trace_logs();
    assert!(
        logs.iter().any(|line| line
            == "[validate] step=0 valid=false invalid=[input#interest-residential,input#interest-business]"),
        "{logs:?}"
    );
    assert!(logs.iter().any(|line| line == "[wizard] advance blocked step=0"));
    assert!(logs.iter().any(|line| line
        == "[event] click target=button#next-0 handlers=[advance] default_prevented=false"));

    wizard.set_trace_events(false);
    wizard.click("#interest-business")?;
    wizard.click("#next-0")?;
    let logs = wizard.take_trace_logs();
    assert!(logs.iter().all(|line| !line.starts_with("[event]")));
    assert!(logs.iter().any(|line| line == "[wizard] advance step 0 -> 1"));

    wizard.set_trace_log_limit(1)?;
    wizard.click("#prev-1")?;
    assert_eq!(wizard.take_trace_logs(), vec!["[wizard] retreat step 1 -> 0"]);
    Ok(())
}

#[test]
fn custom_config_drives_a_different_markup() -> Result<()> {
    let config = WizardConfig::from_json(
        r##"{
            "form": "#signup",
            "step": ".page",
            "next": ".go",
            "prev": ".back",
            "progress": "#bar",
            "classes": { "hidden": "is-hidden", "step_enter": "fade" },
            "acknowledgment": "Thanks!"
        }"##,
    )?;
    let html = r#"
        <form id="signup">
          <section class="page">
            <input id="who" name="who" required>
            <button type="button" class="go">Next</button>
          </section>
          <section class="page">
            <button type="button" class="back">Back</button>
            <button type="submit" id="done">Done</button>
          </section>
        </form>
        <div id="bar"></div>
    "#;
    let mut wizard = QuoteWizard::from_html_with_config(html, config)?;
    wizard.set_trace_stderr(false);

    assert_eq!(wizard.visible_steps(), vec![0]);
    assert!(wizard.has_class(".page", "fade")?);
    assert_eq!(wizard.progress_width().as_deref(), Some("50%"));

    wizard.type_text("#who", "Grace")?;
    wizard.click(".go")?;
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.progress_width().as_deref(), Some("100%"));

    wizard.click("#done")?;
    assert_eq!(wizard.take_acknowledgments(), vec!["Thanks!"]);
    assert_eq!(wizard.current_step(), 0);
    Ok(())
}

#[test]
fn structure_errors_are_reported_at_construction() {
    assert_eq!(
        QuoteWizard::from_html("<form id='quote-form'><p>empty</p></form>").err(),
        Some(Error::MissingElement("form steps".into()))
    );

    let err = QuoteWizard::from_html("<div id='quote-form'><div class='form-step'></div></div>")
        .err();
    assert!(matches!(err, Some(Error::TypeMismatch { ref expected, .. }) if expected == "form"));

    let config = WizardConfig {
        step: "div[".into(),
        ..WizardConfig::default()
    };
    assert!(matches!(
        QuoteWizard::from_html_with_config("<div class='form-step'></div>", config).err(),
        Some(Error::InvalidConfig(_))
    ));
}

#[test]
fn missing_optional_elements_are_tolerated() -> Result<()> {
    let html = r#"
        <div class="form-step"><button type="button" class="btn-next">Next</button></div>
        <div class="form-step"><button type="button" class="btn-prev">Back</button></div>
    "#;
    let mut wizard = quiet_wizard(html)?;
    wizard.click(".btn-next")?;
    assert_eq!(wizard.current_step(), 1);
    assert_eq!(wizard.progress_width(), None);
    assert!(wizard.take_submissions().is_empty());
    Ok(())
}

#[test]
fn user_actions_reject_the_wrong_control_kind() -> Result<()> {
    let mut wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    assert!(matches!(
        wizard.type_text("#consent", "yes"),
        Err(Error::TypeMismatch { ref actual, .. }) if actual == "input[type=checkbox]"
    ));
    assert!(matches!(
        wizard.set_checked("#name", true),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        wizard.select_option("#name", "x"),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(
        wizard.click("#missing"),
        Err(Error::SelectorNotFound("#missing".into()))
    );
    Ok(())
}

#[test]
fn assertion_failures_carry_a_snippet() -> Result<()> {
    let wizard = quiet_wizard(QUOTE_FORM_HTML)?;
    match wizard.assert_value("#name", "Ada") {
        Err(Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        }) => {
            assert_eq!(expected, "Ada");
            assert_eq!(actual, "");
            assert!(dom_snippet.starts_with("<input"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}
