//! Locator catalog for the triage application.
//!
//! Each page is built once and shared. Static elements are [`Target`]s;
//! elements identified by a patient name or priority level are
//! [`TargetTemplate`]s bound through the page's methods, so names are
//! escaped into the query rather than pasted into it.

use screenplay::{
    Locator, LocatorTemplate, PageObject, ScreenplayResult, Target, TargetTemplate,
};
use std::sync::OnceLock;

fn xpath(name: &str, query: &str) -> Target {
    Target::the(name).located_by(Locator::xpath(query))
}

fn css(name: &str, query: &str) -> Target {
    Target::the(name).located_by(Locator::css(query))
}

/// Field reached through its label, else through its `name` attribute
fn labelled_input(name: &str, label: &str, attribute: &str) -> Target {
    xpath(name, &format!("//label[contains(text(), '{label}')]/following::input[1]"))
        .or_else_located_by(Locator::xpath(format!(
            "//input[contains(@name, '{attribute}')]"
        )))
}

// =============================================================================
// LOGIN
// =============================================================================

/// The login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    /// Email field
    pub email_input: Target,
    /// Password field
    pub password_input: Target,
    /// Submit button
    pub login_button: Target,
    /// Branding heading
    pub page_title: Target,
    /// Form heading
    pub login_heading: Target,
    /// Error alert
    pub error_message: Target,
    /// Success alert
    pub success_message: Target,
}

static LOGIN_PAGE: OnceLock<LoginPage> = OnceLock::new();

impl LoginPage {
    /// The shared catalog
    pub fn get() -> &'static Self {
        LOGIN_PAGE.get_or_init(Self::build)
    }

    fn build() -> Self {
        Self {
            email_input: css("the email input field", "input[type='email']"),
            password_input: css("the password input field", "input[type='password']"),
            login_button: css("the login button", "button[type='submit']"),
            page_title: xpath("the HealthTech title", "//h1[contains(text(), 'HealthTech')]")
                .or_else_located_by(Locator::xpath("//h1[contains(@class, 'text-transparent')]")),
            login_heading: xpath(
                "the login heading",
                "//h3[contains(text(), 'Iniciar Sesión')]",
            ),
            error_message: xpath(
                "the login error message",
                "//*[contains(@class, 'error') or contains(@class, 'alert')]",
            ),
            success_message: xpath("the login success message", "//*[contains(@class, 'success')]"),
        }
    }
}

impl PageObject for LoginPage {
    fn path(&self) -> &str {
        "/login"
    }

    fn landmark(&self) -> &Target {
        &self.login_heading
    }

    fn page_name(&self) -> &str {
        "login page"
    }
}

// =============================================================================
// NURSE DASHBOARD
// =============================================================================

/// The nurse dashboard and its patient registration wizard
#[derive(Debug, Clone)]
pub struct NurseDashboardPage {
    /// Page heading
    pub dashboard_title: Target,
    /// Greeting under the heading
    pub welcome_message: Target,
    /// Logout button
    pub logout_button: Target,
    /// Total patients statistic
    pub total_patients_card: Target,
    /// Critical patients statistic
    pub critical_patients_card: Target,
    /// Opens the registration wizard
    pub register_patient_button: Target,

    /// Step 1: full name
    pub patient_name_input: Target,
    /// Step 1: age
    pub patient_age_input: Target,
    /// Step 1: gender
    pub patient_gender_select: Target,
    /// Step 1: identification document
    pub patient_id_input: Target,
    /// Step 1: address
    pub address_input: Target,
    /// Step 1: phone
    pub phone_input: Target,
    /// Step 1: emergency contact name
    pub emergency_contact_input: Target,
    /// Step 1: emergency contact phone
    pub emergency_phone_input: Target,

    /// Step 2: symptoms description
    pub symptoms_textarea: Target,
    /// Step 2: systolic pressure
    pub blood_pressure_systolic: Target,
    /// Step 2: diastolic pressure
    pub blood_pressure_diastolic: Target,
    /// Step 2: heart rate
    pub heart_rate_input: Target,
    /// Step 2: temperature
    pub temperature_input: Target,
    /// Step 2: oxygen saturation
    pub oxygen_saturation_input: Target,
    /// Step 2: respiratory rate
    pub respiratory_rate_input: Target,

    /// Wizard forward button
    pub next_button: Target,
    /// Wizard back button
    pub previous_button: Target,
    /// Wizard cancel button
    pub cancel_button: Target,
    /// Wizard submit button
    pub submit_button: Target,

    /// Patient list container
    pub patient_list: Target,
    /// Every patient card in the list
    pub patient_items: Target,
    /// Success toast
    pub success_message: Target,
    /// Error toast
    pub error_message: Target,
    /// Any toast
    pub any_toast: Target,

    priority_button: TargetTemplate,
    patient_item: TargetTemplate,
}

static NURSE_DASHBOARD: OnceLock<NurseDashboardPage> = OnceLock::new();

impl NurseDashboardPage {
    /// The shared catalog
    pub fn get() -> &'static Self {
        NURSE_DASHBOARD.get_or_init(Self::build)
    }

    #[allow(clippy::too_many_lines)]
    fn build() -> Self {
        Self {
            dashboard_title: xpath(
                "the nurse dashboard title",
                "//h1[contains(text(), 'Dashboard de Enfermería')]",
            ),
            welcome_message: xpath("the welcome message", "//p[contains(text(), 'Bienvenido')]"),
            logout_button: xpath("the logout button", "//button[contains(., 'Cerrar Sesión')]"),
            total_patients_card: xpath(
                "the total patients card",
                "//p[contains(text(), 'Total Pacientes')]/following-sibling::p",
            ),
            critical_patients_card: xpath(
                "the critical patients card",
                "//p[contains(text(), 'Críticos')]/following-sibling::p",
            ),
            register_patient_button: xpath(
                "the register new patient button",
                "//button[contains(., 'Registrar Nuevo Paciente')]",
            ),

            patient_name_input: xpath(
                "the patient name input",
                "//input[contains(@placeholder, 'Pérez') or @name='name']",
            ),
            patient_age_input: xpath(
                "the patient age input",
                "//input[@type='number' and contains(@placeholder, '30')]",
            ),
            patient_gender_select: xpath("the patient gender select", "//select[@name='gender']")
                .or_else_located_by(Locator::css("select")),
            patient_id_input: xpath(
                "the patient identification input",
                "//input[contains(@placeholder, 'DNI') or contains(@placeholder, 'Pasaporte')]",
            ),
            address_input: xpath("the address input", "//input[contains(@placeholder, 'Calle')]"),
            phone_input: xpath("the phone input", "//input[contains(@placeholder, '+34 123')]"),
            emergency_contact_input: xpath(
                "the emergency contact input",
                "//input[contains(@placeholder, 'Nombre del contacto')]",
            ),
            emergency_phone_input: xpath(
                "the emergency phone input",
                "//input[contains(@placeholder, '+34 987')]",
            ),

            symptoms_textarea: xpath(
                "the symptoms textarea",
                "//textarea[contains(@placeholder, 'Describa los síntomas')]",
            ),
            blood_pressure_systolic: labelled_input(
                "the systolic blood pressure",
                "Sistólica",
                "systolic",
            ),
            blood_pressure_diastolic: labelled_input(
                "the diastolic blood pressure",
                "Diastólica",
                "diastolic",
            ),
            heart_rate_input: labelled_input(
                "the heart rate input",
                "Frecuencia Cardíaca",
                "heartRate",
            ),
            temperature_input: labelled_input(
                "the temperature input",
                "Temperatura",
                "temperature",
            ),
            oxygen_saturation_input: labelled_input(
                "the oxygen saturation input",
                "Saturación",
                "oxygenSaturation",
            ),
            respiratory_rate_input: labelled_input(
                "the respiratory rate input",
                "Respiratoria",
                "respiratoryRate",
            ),

            next_button: xpath("the next step button", "//button[contains(., 'Siguiente')]"),
            previous_button: xpath(
                "the previous step button",
                "//button[contains(., 'Anterior')]",
            ),
            cancel_button: xpath("the cancel button", "//button[contains(., 'Cancelar')]"),
            submit_button: xpath(
                "the register patient button",
                "//button[contains(., 'Registrar Paciente')]",
            ),

            patient_list: xpath(
                "the patient list container",
                "//div[contains(@class, 'space-y')]",
            ),
            patient_items: xpath(
                "the patient cards",
                "//div[contains(@class, 'space-y')]//div[contains(@class, 'card') or contains(@class, 'Card')]",
            ),
            success_message: xpath(
                "the success toast message",
                "//*[contains(@class, 'toast') or contains(@class, 'success') or contains(@class, 'alert')][contains(., 'exitosamente') or contains(., 'éxito')]",
            ),
            error_message: xpath(
                "the error toast message",
                "//*[contains(@class, 'toast') or contains(@class, 'error') or contains(@class, 'alert')][contains(., 'error') or contains(., 'Error')]",
            ),
            any_toast: xpath(
                "any toast notification",
                "//*[contains(@class, 'toast') or contains(@role, 'alert')]",
            ),

            priority_button: TargetTemplate::the("the priority button {1}").located_by(
                LocatorTemplate::xpath(
                    "//button[contains(., {0}) or contains(., {1}) or contains(@data-priority, {2})]",
                ),
            ),
            patient_item: TargetTemplate::the("the patient card for {0}").located_by(
                LocatorTemplate::xpath(
                    "//*[contains(text(), {0})]/ancestor::div[contains(@class, 'card') or contains(@class, 'Card')]",
                ),
            ),
        }
    }

    /// Priority button for a level given as `"3"` or `"P3"`
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the level cannot be escaped.
    pub fn priority_button(&self, priority: &str) -> ScreenplayResult<Target> {
        let level = priority_level(priority);
        let label = format!("Nivel {level}");
        let badge = format!("P{level}");
        self.priority_button.of(&[label.as_str(), badge.as_str(), level])
    }

    /// The list card of a patient
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the name cannot be escaped.
    pub fn patient_item(&self, patient_name: &str) -> ScreenplayResult<Target> {
        self.patient_item.of(&[patient_name])
    }
}

/// Level digits of a priority written as `"3"` or `"P3"`
pub fn priority_level(priority: &str) -> &str {
    let trimmed = priority.trim();
    trimmed
        .strip_prefix('P')
        .or_else(|| trimmed.strip_prefix('p'))
        .unwrap_or(trimmed)
}

impl PageObject for NurseDashboardPage {
    fn path(&self) -> &str {
        "/nurse"
    }

    fn landmark(&self) -> &Target {
        &self.dashboard_title
    }

    fn page_name(&self) -> &str {
        "nurse dashboard"
    }
}

// =============================================================================
// DOCTOR DASHBOARD
// =============================================================================

/// The doctor dashboard and its patient modal
#[derive(Debug, Clone)]
pub struct DoctorDashboardPage {
    /// Page heading
    pub dashboard_title: Target,
    /// Greeting under the heading
    pub welcome_message: Target,
    /// Logout button
    pub logout_button: Target,
    /// Total patients statistic
    pub total_patients_stat: Target,
    /// Patients assigned to the doctor
    pub my_patients_stat: Target,
    /// Critical patients statistic
    pub critical_patients_stat: Target,
    /// Average wait statistic
    pub avg_wait_time_stat: Target,
    /// Search box
    pub search_input: Target,
    /// Priority filter
    pub priority_filter: Target,
    /// Status filter
    pub status_filter: Target,
    /// Patient list container
    pub patient_list: Target,
    /// Every patient card in the list
    pub patient_cards: Target,
    /// No patients placeholder
    pub empty_state: Target,

    /// Modal heading
    pub modal_title: Target,
    /// Assigns the patient to the doctor
    pub take_case_button: Target,
    /// Opens the comment box
    pub add_comment_button: Target,
    /// Comment box
    pub comment_textarea: Target,
    /// Saves the comment
    pub save_comment_button: Target,
    /// Free-form status select
    pub process_select: Target,
    /// Applies the selected status
    pub update_status_button: Target,
    /// Discharge action
    pub discharge_button: Target,
    /// Hospitalization action
    pub hospitalize_button: Target,
    /// Referral action
    pub transfer_button: Target,
    /// Intensive care action
    pub icu_button: Target,
    /// Closes the modal
    pub close_modal_button: Target,

    /// Success toast
    pub success_message: Target,
    /// Error toast
    pub error_message: Target,

    patient_card: TargetTemplate,
    view_details_button: TargetTemplate,
    patient_status: TargetTemplate,
    patient_priority: TargetTemplate,
}

static DOCTOR_DASHBOARD: OnceLock<DoctorDashboardPage> = OnceLock::new();

impl DoctorDashboardPage {
    /// The shared catalog
    pub fn get() -> &'static Self {
        DOCTOR_DASHBOARD.get_or_init(Self::build)
    }

    #[allow(clippy::too_many_lines)]
    fn build() -> Self {
        let stat = |name: &str, label: &str| {
            xpath(
                name,
                &format!("//p[contains(text(), '{label}')]/following-sibling::p"),
            )
        };
        Self {
            dashboard_title: xpath(
                "the doctor dashboard title",
                "//h1[contains(text(), 'Dashboard Médico')]",
            ),
            welcome_message: xpath("the welcome message", "//p[contains(text(), 'Bienvenido')]"),
            logout_button: xpath("the logout button", "//button[contains(., 'Cerrar Sesión')]"),
            total_patients_stat: stat("the total patients stat", "Total Pacientes"),
            my_patients_stat: stat("the my patients stat", "Mis Pacientes"),
            critical_patients_stat: stat("the critical patients stat", "Críticos"),
            avg_wait_time_stat: stat("the average wait time stat", "Tiempo Prom"),
            search_input: xpath("the search input", "//input[contains(@placeholder, 'Buscar')]"),
            priority_filter: xpath(
                "the priority filter select",
                "//select[contains(., 'Todas las prioridades')]",
            ),
            status_filter: xpath(
                "the status filter select",
                "//select[contains(., 'Todos los estados')]",
            ),
            patient_list: xpath(
                "the patient list container",
                "//div[contains(@class, 'space-y-3')]",
            ),
            patient_cards: xpath(
                "the patient cards",
                "//div[contains(@class, 'space-y-3')]//div[contains(@class, 'cursor-pointer')]",
            ),
            empty_state: xpath(
                "the empty state message",
                "//h3[contains(text(), 'No hay pacientes')]",
            ),

            modal_title: xpath("the modal title", "//div[contains(@class, 'modal')]//h2")
                .or_else_located_by(Locator::xpath("//div[contains(@role, 'dialog')]//h2")),
            take_case_button: xpath(
                "the take case button",
                "//button[contains(., 'Tomar Caso') or contains(., 'Asignarme')]",
            ),
            add_comment_button: xpath(
                "the add comment button",
                "//button[contains(., 'Agregar Comentario') or contains(., 'Comentario')]",
            ),
            comment_textarea: css("the comment textarea", "textarea"),
            save_comment_button: xpath(
                "the save comment button",
                "//button[contains(., 'Guardar') and contains(., 'Comentario')]",
            )
            .or_else_located_by(Locator::xpath("//button[contains(., 'Agregar')]")),
            process_select: xpath(
                "the process select dropdown",
                "//select[contains(@name, 'status') or contains(@id, 'status')]",
            )
            .or_else_located_by(Locator::xpath(
                "//label[contains(text(), 'Estado')]/following::select[1]",
            )),
            update_status_button: xpath(
                "the update status button",
                "//button[contains(., 'Actualizar') and contains(., 'Estado')]",
            ),
            discharge_button: xpath(
                "the discharge patient button",
                "//button[contains(., 'Dar de Alta')]",
            ),
            hospitalize_button: xpath(
                "the hospitalize button",
                "//button[contains(., 'Hospitalizar')]",
            ),
            transfer_button: xpath(
                "the transfer button",
                "//button[contains(., 'Transferir') or contains(., 'Remitir')]",
            ),
            icu_button: xpath("the ICU button", "//button[contains(., 'UCI')]"),
            close_modal_button: xpath(
                "the close modal button",
                "//button[contains(@class, 'close') or contains(., '×') or @aria-label='Close']",
            ),

            success_message: xpath(
                "the success message",
                "//*[contains(@class, 'toast') or contains(@class, 'success')][contains(., 'exitosamente') or contains(., 'éxito')]",
            ),
            error_message: xpath(
                "the error message",
                "//*[contains(@class, 'toast') or contains(@class, 'error')][contains(., 'error') or contains(., 'Error')]",
            ),

            patient_card: TargetTemplate::the("the patient card for {0}").located_by(
                LocatorTemplate::xpath(
                    "//h3[contains(text(), {0})]/ancestor::div[contains(@class, 'cursor-pointer')]",
                ),
            ),
            view_details_button: TargetTemplate::the("the view details button for {0}")
                .located_by(LocatorTemplate::xpath(
                    "//h3[contains(text(), {0})]/ancestor::div//button[contains(., 'Ver Detalles')]",
                )),
            patient_status: TargetTemplate::the("the status badge for {0}").located_by(
                LocatorTemplate::xpath(
                    "//h3[contains(text(), {0})]/following-sibling::*[contains(@class, 'badge')]",
                ),
            ),
            patient_priority: TargetTemplate::the("the priority badge for {0}").located_by(
                LocatorTemplate::xpath(
                    "//h3[contains(text(), {0})]/parent::div//span[contains(., 'P')]",
                ),
            ),
        }
    }

    /// The list card of a patient
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the name cannot be escaped.
    pub fn patient_card(&self, patient_name: &str) -> ScreenplayResult<Target> {
        self.patient_card.of(&[patient_name])
    }

    /// The details button on a patient's card
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the name cannot be escaped.
    pub fn view_details_button(&self, patient_name: &str) -> ScreenplayResult<Target> {
        self.view_details_button.of(&[patient_name])
    }

    /// The status badge on a patient's card
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the name cannot be escaped.
    pub fn patient_status(&self, patient_name: &str) -> ScreenplayResult<Target> {
        self.patient_status.of(&[patient_name])
    }

    /// The priority badge on a patient's card
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the name cannot be escaped.
    pub fn patient_priority(&self, patient_name: &str) -> ScreenplayResult<Target> {
        self.patient_priority.of(&[patient_name])
    }
}

impl PageObject for DoctorDashboardPage {
    fn path(&self) -> &str {
        "/doctor"
    }

    fn landmark(&self) -> &Target {
        &self.dashboard_title
    }

    fn page_name(&self) -> &str {
        "doctor dashboard"
    }
}
