//! Logging in and landing on a dashboard.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use screenplay::{
    contains_text, is, is_false, is_true, see_that, Actor, BrowseTheWeb, CurrentUrl,
    ScreenplayError,
};
use screenplay_triage::questions::TheDashboard;
use screenplay_triage::questions::ThePatient;
use screenplay_triage::tasks::Login;
use screenplay_triage::Role;
use support::{logged_in, test_config, FakeTriageApp};

#[test]
fn test_nurse_lands_on_nurse_dashboard() {
    let config = test_config();
    let app = FakeTriageApp::new();
    let ana = logged_in(Role::Nurse, &app, &config);

    ana.should_within(
        &see_that(TheDashboard::nurse_dashboard_is_displayed(), is_true()),
        &config.timeouts.page(),
    )
    .unwrap();
    ana.should(&see_that(CurrentUrl::of_the_page(), contains_text("/nurse")))
        .unwrap();
    assert!(!ana.asks_for(&TheDashboard::doctor_dashboard_is_displayed()));
}

#[test]
fn test_doctor_lands_on_doctor_dashboard() {
    let config = test_config();
    let app = FakeTriageApp::new();
    let carlos = logged_in(Role::Doctor, &app, &config);

    carlos
        .should_within(
            &see_that(TheDashboard::doctor_dashboard_is_displayed(), is_true()),
            &config.timeouts.page(),
        )
        .unwrap();
    assert!(carlos.asks_for(&TheDashboard::is_displayed()));
}

#[test]
fn test_wrong_password_shows_error() {
    let config = test_config();
    let app = FakeTriageApp::new();
    let mut ana = Actor::named("Ana").who_can(BrowseTheWeb::with(app.clone()));

    let login = Login::with_credentials("ana.garcia@healthtech.com", "wrong").build(&config);
    ana.attempts_to(&login.unwrap()).unwrap();

    ana.should_within(
        &see_that(ThePatient::has_error_message(), is_true()),
        &config.timeouts.short(),
    )
    .unwrap();
    ana.should(&see_that(TheDashboard::is_displayed(), is_false()))
        .unwrap();
    assert!(app.actions().iter().any(|a| a.ends_with("/login")));
}

#[test]
fn test_unreachable_application_fails_navigation() {
    let config = test_config().with_base_url("http://localhost:9999");
    let app = FakeTriageApp::new();
    let mut ana = Actor::named("Ana").who_can(BrowseTheWeb::with(app));

    let login = Login::as_role(Role::Nurse).build(&config).unwrap();
    let err = ana.attempts_to(&login).unwrap_err();

    assert!(matches!(err, ScreenplayError::Navigation { .. }));
    let report = ana.failure_report().expect("failure report");
    assert!(report.contains("log in as ana.garcia@healthtech.com"));
}

#[test]
fn test_dashboard_counts_patients() {
    let config = test_config();
    let app = FakeTriageApp::new()
        .with_patient("María López", 62, "2")
        .with_patient("Pedro Sánchez", 30, "4");
    let carlos = logged_in(Role::Doctor, &app, &config);

    carlos
        .should_within(
            &see_that(TheDashboard::patient_count(), is(2)),
            &config.timeouts.page(),
        )
        .unwrap();
}

#[test]
fn test_dismissing_actor_closes_session() {
    let config = test_config();
    let app = FakeTriageApp::new();
    let ana = logged_in(Role::Nurse, &app, &config);

    ana.dismiss().unwrap();
    assert!(app.is_closed());
}
