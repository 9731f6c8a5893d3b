//! In-process stand-in for the triage web application.
//!
//! `FakeTriageApp` implements the driver boundary by recognising the
//! catalog's locators and answering from a small model of the application:
//! who is logged in, which screen is showing, the registration wizard, the
//! patient modal and the toasts. Every screen change re-renders after a
//! latency, so tasks only pass if they wait the way they would against the
//! real frontend.

#![allow(dead_code, clippy::expect_used)]

use screenplay::{
    Actor, BrowseTheWeb, ElementHandle, Locator, LocatorStrategy, ScenarioConfig, ScreenplayError,
    ScreenplayResult, Target, Timeouts, WebSession,
};
use screenplay_triage::tasks::Login;
use screenplay_triage::{default_config, DoctorDashboardPage, LoginPage, NurseDashboardPage, Role};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

pub const RENDER_LATENCY: Duration = Duration::from_millis(25);

const GENDERS: [&str; 3] = ["Masculino", "Femenino", "Otro"];
const STATUSES: [&str; 6] = [
    "En espera",
    "En atención",
    "En observación",
    "Hospitalizado",
    "Alta",
    "Remitido",
];

/// Configuration with short timeouts and fast polling
pub fn test_config() -> ScenarioConfig {
    default_config().with_timeouts(Timeouts {
        short_ms: 1_000,
        standard_ms: 1_500,
        page_ms: 2_000,
        poll_interval_ms: 10,
    })
}

/// An actor browsing `app` who has already logged in as `role`
pub fn logged_in(role: Role, app: &FakeTriageApp, config: &ScenarioConfig) -> Actor {
    let mut actor = Actor::named(role.name()).who_can(BrowseTheWeb::with(app.clone()));
    let login = Login::as_role(role).build(config).expect("login task");
    actor.attempts_to(&login).expect("log in");
    actor
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    Name,
    Age,
    Identification,
    EmergencyContact,
    EmergencyPhone,
    Symptoms,
    Systolic,
    Diastolic,
    HeartRate,
    Temperature,
    Oxygen,
    Respiratory,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Process {
    Hospitalize,
    Discharge,
    Transfer,
    Icu,
}

impl Process {
    const fn status(self) -> &'static str {
        match self {
            Self::Hospitalize => "Hospitalizado",
            Self::Discharge => "Alta",
            Self::Transfer => "Remitido",
            Self::Icu => "UCI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Element {
    LoginHeading,
    LoginTitle,
    LoginButton,
    NurseTitle,
    DoctorTitle,
    Welcome,
    Logout,
    RegisterButton,
    Input(Field),
    GenderSelect,
    NextButton,
    PreviousButton,
    SubmitButton,
    PriorityButton(String),
    NursePatientList,
    NursePatients,
    PatientItem(String),
    DoctorPatientList,
    DoctorPatients,
    PatientCard(String),
    PatientStatus(String),
    ModalTitle,
    TakeCaseButton,
    SaveCommentButton,
    ProcessSelect,
    UpdateStatusButton,
    ProcessButton(Process),
    SuccessToast,
    ErrorToast,
    AnyToast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Nurse,
    Doctor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub priority: Option<String>,
    pub status: String,
    pub assigned_to: Option<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone)]
struct Toast {
    success: bool,
    text: String,
}

#[derive(Debug)]
struct AppState {
    base_url: String,
    url: String,
    screen: Screen,
    user: Option<(Role, String)>,
    wizard: Option<u8>,
    modal: Option<String>,
    values: HashMap<Field, String>,
    gender: String,
    process_choice: Option<String>,
    priority: Option<String>,
    patients: Vec<Patient>,
    toast: Option<Toast>,
    ready_at: Instant,
    latency: Duration,
    handles: HashMap<String, Element>,
    actions: Vec<String>,
    closed: bool,
}

impl AppState {
    fn transition(&mut self) {
        self.toast = None;
        self.ready_at = Instant::now() + self.latency;
    }

    fn toast(&mut self, success: bool, text: &str) {
        self.toast = Some(Toast {
            success,
            text: text.to_string(),
        });
    }

    fn patient(&self, name: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.name == name)
    }

    fn patient_mut(&mut self, name: &str) -> Option<&mut Patient> {
        self.patients.iter_mut().find(|p| p.name == name)
    }

    fn doctor_email(&self) -> Option<&str> {
        match &self.user {
            Some((Role::Doctor, email)) => Some(email),
            _ => None,
        }
    }

    fn modal_patient(&self) -> Option<&Patient> {
        self.modal.as_deref().and_then(|name| self.patient(name))
    }

    fn renders(&self, element: &Element) -> bool {
        if Instant::now() < self.ready_at {
            return false;
        }
        match element {
            Element::SuccessToast => self.toast.as_ref().is_some_and(|t| t.success),
            Element::ErrorToast => self.toast.as_ref().is_some_and(|t| !t.success),
            Element::AnyToast => self.toast.is_some(),
            _ => match self.screen {
                Screen::Blank => false,
                Screen::Login => self.renders_login(element),
                Screen::Nurse => self.renders_nurse(element),
                Screen::Doctor => self.renders_doctor(element),
            },
        }
    }

    fn renders_login(&self, element: &Element) -> bool {
        matches!(
            element,
            Element::LoginHeading
                | Element::LoginTitle
                | Element::LoginButton
                | Element::Input(Field::Email | Field::Password)
        )
    }

    fn renders_nurse(&self, element: &Element) -> bool {
        let step = self.wizard.unwrap_or(0);
        match element {
            Element::NurseTitle
            | Element::Welcome
            | Element::Logout
            | Element::RegisterButton
            | Element::NursePatientList
            | Element::NursePatients => true,
            Element::PatientItem(name) => self.patient(name).is_some(),
            Element::Input(
                Field::Name
                | Field::Age
                | Field::Identification
                | Field::EmergencyContact
                | Field::EmergencyPhone,
            )
            | Element::GenderSelect => step == 1,
            Element::Input(
                Field::Symptoms
                | Field::Systolic
                | Field::Diastolic
                | Field::HeartRate
                | Field::Temperature
                | Field::Oxygen
                | Field::Respiratory,
            ) => step == 2,
            Element::NextButton => step == 1 || step == 2,
            Element::PreviousButton => step == 2 || step == 3,
            Element::PriorityButton(_) | Element::SubmitButton => step == 3,
            _ => false,
        }
    }

    fn renders_doctor(&self, element: &Element) -> bool {
        let modal = self.modal_patient();
        match element {
            Element::DoctorTitle
            | Element::Welcome
            | Element::Logout
            | Element::DoctorPatientList
            | Element::DoctorPatients => true,
            Element::PatientCard(name) | Element::PatientStatus(name) => {
                self.patient(name).is_some()
            }
            Element::ModalTitle
            | Element::Input(Field::Comment)
            | Element::SaveCommentButton
            | Element::ProcessSelect
            | Element::UpdateStatusButton => modal.is_some(),
            Element::TakeCaseButton => modal.is_some_and(|p| p.assigned_to.is_none()),
            Element::ProcessButton(_) => modal.is_some_and(|p| {
                p.assigned_to.is_some() && p.assigned_to.as_deref() == self.doctor_email()
            }),
            _ => false,
        }
    }

    fn enabled(&self, element: &Element) -> bool {
        match element {
            Element::NextButton if self.wizard == Some(1) => self
                .values
                .get(&Field::Name)
                .is_some_and(|name| !name.trim().is_empty()),
            _ => true,
        }
    }

    fn text(&self, element: &Element) -> String {
        let names = || {
            self.patients
                .iter()
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
                .join("\n")
        };
        match element {
            Element::LoginHeading => "Iniciar Sesión".to_string(),
            Element::LoginTitle => "HealthTech".to_string(),
            Element::NurseTitle => "Dashboard de Enfermería".to_string(),
            Element::DoctorTitle => "Dashboard Médico".to_string(),
            Element::Input(field) => self.values.get(field).cloned().unwrap_or_default(),
            Element::GenderSelect => self.gender.clone(),
            Element::NursePatientList | Element::DoctorPatientList => names(),
            Element::PatientItem(name) | Element::PatientCard(name) => name.clone(),
            Element::PatientStatus(name) => {
                self.patient(name).map(|p| p.status.clone()).unwrap_or_default()
            }
            Element::ModalTitle => self.modal.clone().unwrap_or_default(),
            Element::ProcessSelect => self
                .process_choice
                .clone()
                .or_else(|| self.modal_patient().map(|p| p.status.clone()))
                .unwrap_or_default(),
            Element::SuccessToast | Element::ErrorToast | Element::AnyToast => {
                self.toast.as_ref().map(|t| t.text.clone()).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    fn element(&self, handle: &ElementHandle) -> ScreenplayResult<Element> {
        let element = self
            .handles
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| ScreenplayError::not_found(&handle.id, "unknown element handle"))?;
        if self.renders(&element) {
            Ok(element)
        } else {
            Err(ScreenplayError::not_found(&handle.id, "stale element handle"))
        }
    }

    fn interactable(&self, handle: &ElementHandle) -> ScreenplayResult<Element> {
        let element = self.element(handle)?;
        if self.enabled(&element) {
            Ok(element)
        } else {
            Err(ScreenplayError::not_interactable(&handle.id, "element is disabled"))
        }
    }

    fn navigate(&mut self, path: &str) {
        self.wizard = None;
        self.modal = None;
        self.screen = match (path, &self.user) {
            ("/login", _) => Screen::Login,
            ("/nurse", Some((Role::Nurse, _))) => Screen::Nurse,
            ("/doctor", Some((Role::Doctor, _))) => Screen::Doctor,
            ("/nurse" | "/doctor", _) => Screen::Login,
            _ => Screen::Blank,
        };
        let shown = match self.screen {
            Screen::Login => "/login",
            Screen::Nurse => "/nurse",
            Screen::Doctor => "/doctor",
            Screen::Blank => path,
        };
        self.url = format!("{}{shown}", self.base_url);
        self.transition();
    }

    fn log_in(&mut self) {
        let email = self.values.get(&Field::Email).cloned().unwrap_or_default();
        let password = self.values.get(&Field::Password).cloned().unwrap_or_default();
        let role = Role::ALL.into_iter().find(|role| {
            let demo = role.demo_credentials();
            demo.email == email && demo.password == password
        });
        match role {
            Some(role) => {
                self.user = Some((role, email));
                self.values.clear();
                let home = match role {
                    Role::Nurse => "/nurse",
                    Role::Doctor => "/doctor",
                    Role::Admin => "/admin",
                };
                self.navigate(home);
            }
            None => self.toast(false, "Error: credenciales inválidas"),
        }
    }

    fn submit_registration(&mut self) {
        let name = self.values.get(&Field::Name).cloned().unwrap_or_default();
        let age = self.values.get(&Field::Age).cloned().unwrap_or_default();
        if self.patient(&name).is_some() {
            self.toast(false, "Error: el paciente ya está registrado");
            return;
        }
        self.patients.push(Patient {
            name,
            age,
            gender: self.gender.clone(),
            priority: self.priority.take(),
            status: "En espera".to_string(),
            assigned_to: None,
            comments: Vec::new(),
        });
        self.wizard = None;
        self.transition();
        self.toast(true, "Paciente registrado exitosamente");
    }

    fn take_case(&mut self) {
        let doctor = self.doctor_email().map(str::to_string);
        let comment = self.values.remove(&Field::Comment).filter(|c| !c.is_empty());
        if let Some(patient) = self.modal.clone().and_then(|name| self.patient_mut(&name)) {
            patient.assigned_to = doctor;
            patient.status = "En atención".to_string();
            patient.comments.extend(comment);
        }
        self.modal = None;
        self.transition();
        self.toast(true, "Caso tomado exitosamente");
    }

    fn save_comment(&mut self) {
        let comment = self.values.remove(&Field::Comment).unwrap_or_default();
        if let Some(patient) = self.modal.clone().and_then(|name| self.patient_mut(&name)) {
            patient.comments.push(comment);
        }
        self.toast(true, "Comentario agregado exitosamente");
    }

    fn set_status(&mut self, status: String) {
        if let Some(patient) = self.modal.clone().and_then(|name| self.patient_mut(&name)) {
            patient.status = status;
        }
        self.modal = None;
        self.process_choice = None;
        self.transition();
        self.toast(true, "Estado actualizado exitosamente");
    }
}

/// The simulated application; clones share state
#[derive(Debug, Clone)]
pub struct FakeTriageApp {
    state: Arc<Mutex<AppState>>,
}

impl Default for FakeTriageApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTriageApp {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState {
                base_url: screenplay_triage::DEFAULT_BASE_URL.to_string(),
                url: "about:blank".to_string(),
                screen: Screen::Blank,
                user: None,
                wizard: None,
                modal: None,
                values: HashMap::new(),
                gender: String::new(),
                process_choice: None,
                priority: None,
                patients: Vec::new(),
                toast: None,
                ready_at: Instant::now(),
                latency: RENDER_LATENCY,
                handles: HashMap::new(),
                actions: Vec::new(),
                closed: false,
            })),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a waiting, unassigned patient
    pub fn with_patient(self, name: &str, age: u32, priority: &str) -> Self {
        self.state().patients.push(Patient {
            name: name.to_string(),
            age: age.to_string(),
            gender: "Femenino".to_string(),
            priority: Some(priority.to_string()),
            status: "En espera".to_string(),
            assigned_to: None,
            comments: Vec::new(),
        });
        self
    }

    pub fn patient(&self, name: &str) -> Option<Patient> {
        self.state().patient(name).cloned()
    }

    pub fn patients(&self) -> Vec<Patient> {
        self.state().patients.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.state().actions.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn static_catalog() -> Vec<(&'static Target, Element)> {
        let login = LoginPage::get();
        let nurse = NurseDashboardPage::get();
        let doctor = DoctorDashboardPage::get();
        vec![
            (&login.email_input, Element::Input(Field::Email)),
            (&login.password_input, Element::Input(Field::Password)),
            (&login.login_button, Element::LoginButton),
            (&login.page_title, Element::LoginTitle),
            (&login.login_heading, Element::LoginHeading),
            (&login.error_message, Element::ErrorToast),
            (&login.success_message, Element::SuccessToast),
            (&nurse.dashboard_title, Element::NurseTitle),
            (&nurse.welcome_message, Element::Welcome),
            (&nurse.logout_button, Element::Logout),
            (&nurse.register_patient_button, Element::RegisterButton),
            (&nurse.patient_name_input, Element::Input(Field::Name)),
            (&nurse.patient_age_input, Element::Input(Field::Age)),
            (&nurse.patient_gender_select, Element::GenderSelect),
            (&nurse.patient_id_input, Element::Input(Field::Identification)),
            (&nurse.emergency_contact_input, Element::Input(Field::EmergencyContact)),
            (&nurse.emergency_phone_input, Element::Input(Field::EmergencyPhone)),
            (&nurse.symptoms_textarea, Element::Input(Field::Symptoms)),
            (&nurse.blood_pressure_systolic, Element::Input(Field::Systolic)),
            (&nurse.blood_pressure_diastolic, Element::Input(Field::Diastolic)),
            (&nurse.heart_rate_input, Element::Input(Field::HeartRate)),
            (&nurse.temperature_input, Element::Input(Field::Temperature)),
            (&nurse.oxygen_saturation_input, Element::Input(Field::Oxygen)),
            (&nurse.respiratory_rate_input, Element::Input(Field::Respiratory)),
            (&nurse.next_button, Element::NextButton),
            (&nurse.previous_button, Element::PreviousButton),
            (&nurse.submit_button, Element::SubmitButton),
            (&nurse.patient_list, Element::NursePatientList),
            (&nurse.patient_items, Element::NursePatients),
            (&nurse.success_message, Element::SuccessToast),
            (&nurse.error_message, Element::ErrorToast),
            (&nurse.any_toast, Element::AnyToast),
            (&doctor.dashboard_title, Element::DoctorTitle),
            (&doctor.patient_list, Element::DoctorPatientList),
            (&doctor.patient_cards, Element::DoctorPatients),
            (&doctor.modal_title, Element::ModalTitle),
            (&doctor.take_case_button, Element::TakeCaseButton),
            (&doctor.comment_textarea, Element::Input(Field::Comment)),
            (&doctor.save_comment_button, Element::SaveCommentButton),
            (&doctor.process_select, Element::ProcessSelect),
            (&doctor.update_status_button, Element::UpdateStatusButton),
            (&doctor.hospitalize_button, Element::ProcessButton(Process::Hospitalize)),
            (&doctor.discharge_button, Element::ProcessButton(Process::Discharge)),
            (&doctor.transfer_button, Element::ProcessButton(Process::Transfer)),
            (&doctor.icu_button, Element::ProcessButton(Process::Icu)),
            (&doctor.success_message, Element::SuccessToast),
            (&doctor.error_message, Element::ErrorToast),
        ]
    }

    fn same_query(a: &Locator, b: &Locator) -> bool {
        a.strategy() == b.strategy() && a.query() == b.query()
    }

    fn identify(state: &AppState, locator: &Locator) -> Option<Element> {
        let hits = |target: &Target| target.locators().iter().any(|l| Self::same_query(l, locator));
        if let Some((_, element)) = Self::static_catalog()
            .into_iter()
            .find(|(target, _)| hits(*target))
        {
            return Some(element);
        }
        if locator.strategy() != LocatorStrategy::XPath {
            return None;
        }
        let nurse = NurseDashboardPage::get();
        let doctor = DoctorDashboardPage::get();
        for level in ["1", "2", "3", "4", "5"] {
            if nurse.priority_button(level).is_ok_and(|t| hits(&t)) {
                return Some(Element::PriorityButton(level.to_string()));
            }
        }
        for patient in &state.patients {
            let name = patient.name.as_str();
            if nurse.patient_item(name).is_ok_and(|t| hits(&t)) {
                return Some(Element::PatientItem(patient.name.clone()));
            }
            if doctor.patient_card(name).is_ok_and(|t| hits(&t)) {
                return Some(Element::PatientCard(patient.name.clone()));
            }
            if doctor.patient_status(name).is_ok_and(|t| hits(&t)) {
                return Some(Element::PatientStatus(patient.name.clone()));
            }
        }
        None
    }

    fn expand(state: &AppState, element: Element) -> Vec<Element> {
        match element {
            Element::NursePatients => state
                .patients
                .iter()
                .map(|p| Element::PatientItem(p.name.clone()))
                .collect(),
            Element::DoctorPatients => state
                .patients
                .iter()
                .map(|p| Element::PatientCard(p.name.clone()))
                .collect(),
            other => vec![other],
        }
    }
}

impl WebSession for FakeTriageApp {
    fn open(&mut self, url: &str) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.actions.push(format!("open:{url}"));
        let Some(path) = url.strip_prefix(state.base_url.as_str()) else {
            return Err(ScreenplayError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        };
        let path = if path.is_empty() { "/" } else { path }.to_string();
        state.navigate(&path);
        Ok(())
    }

    fn resolve(&self, locator: &Locator) -> Vec<ElementHandle> {
        let mut state = self.state();
        let Some(element) = Self::identify(&state, locator) else {
            return Vec::new();
        };
        let elements: Vec<Element> = Self::expand(&state, element)
            .into_iter()
            .filter(|e| state.renders(e))
            .collect();
        elements
            .into_iter()
            .map(|element| {
                let id = format!("{element:?}");
                state.handles.insert(id.clone(), element);
                ElementHandle::new(id)
            })
            .collect()
    }

    fn click(&mut self, handle: &ElementHandle) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.actions.push(format!("click:{handle}"));
        match state.interactable(handle)? {
            Element::LoginButton => state.log_in(),
            Element::RegisterButton => {
                state.values.clear();
                state.gender = GENDERS[0].to_string();
                state.priority = None;
                state.wizard = Some(1);
                state.transition();
            }
            Element::NextButton => {
                state.wizard = state.wizard.map(|step| (step + 1).min(3));
                state.transition();
            }
            Element::PreviousButton => {
                state.wizard = state.wizard.map(|step| step.saturating_sub(1).max(1));
                state.transition();
            }
            Element::PriorityButton(level) => state.priority = Some(level),
            Element::SubmitButton => state.submit_registration(),
            Element::PatientCard(name) => {
                state.modal = Some(name);
                state.process_choice = None;
                state.transition();
            }
            Element::TakeCaseButton => state.take_case(),
            Element::SaveCommentButton => state.save_comment(),
            Element::ProcessButton(process) => state.set_status(process.status().to_string()),
            Element::UpdateStatusButton => {
                let status = state
                    .process_choice
                    .clone()
                    .or_else(|| state.modal_patient().map(|p| p.status.clone()))
                    .unwrap_or_default();
                state.set_status(status);
            }
            _ => {}
        }
        Ok(())
    }

    fn type_text(&mut self, handle: &ElementHandle, text: &str) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.actions.push(format!("type:{handle}"));
        match state.interactable(handle)? {
            Element::Input(field) => {
                state.values.entry(field).or_default().push_str(text);
                Ok(())
            }
            _ => Err(ScreenplayError::not_interactable(&handle.id, "not a text field")),
        }
    }

    fn clear(&mut self, handle: &ElementHandle) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.actions.push(format!("clear:{handle}"));
        match state.interactable(handle)? {
            Element::Input(field) => {
                state.values.insert(field, String::new());
                Ok(())
            }
            _ => Err(ScreenplayError::not_interactable(&handle.id, "not a text field")),
        }
    }

    fn select_by_visible_text(
        &mut self,
        handle: &ElementHandle,
        text: &str,
    ) -> ScreenplayResult<()> {
        let mut state = self.state();
        state.actions.push(format!("select:{handle}:{text}"));
        match state.interactable(handle)? {
            Element::GenderSelect if GENDERS.contains(&text) => {
                state.gender = text.to_string();
                Ok(())
            }
            Element::ProcessSelect if STATUSES.contains(&text) => {
                state.process_choice = Some(text.to_string());
                Ok(())
            }
            _ => Err(ScreenplayError::not_interactable(
                &handle.id,
                format!("no option labelled {text:?}"),
            )),
        }
    }

    fn select_by_value(&mut self, handle: &ElementHandle, value: &str) -> ScreenplayResult<()> {
        self.select_by_visible_text(handle, value)
    }

    fn text(&self, handle: &ElementHandle) -> ScreenplayResult<String> {
        let state = self.state();
        let element = state.element(handle)?;
        Ok(state.text(&element))
    }

    fn is_visible(&self, handle: &ElementHandle) -> ScreenplayResult<bool> {
        let state = self.state();
        state.element(handle).map(|_| true)
    }

    fn is_enabled(&self, handle: &ElementHandle) -> ScreenplayResult<bool> {
        let state = self.state();
        let element = state.element(handle)?;
        Ok(state.enabled(&element))
    }

    fn current_url(&self) -> ScreenplayResult<String> {
        Ok(self.state().url.clone())
    }

    fn close(&mut self) -> ScreenplayResult<()> {
        self.state().closed = true;
        Ok(())
    }
}
