use super::until;
use crate::pages::NurseDashboardPage;
use screenplay::{
    Click, ElementState, Enter, Interaction, ScenarioConfig, ScreenplayResult, SelectFromOptions,
    Target, Task, Wizard, WizardStep,
};

/// Vital signs entered in the second wizard step
#[derive(Debug, Clone, PartialEq)]
pub struct VitalSigns {
    /// Written as `systolic/diastolic`; skipped unless it has both parts
    pub blood_pressure: String,
    /// Beats per minute
    pub heart_rate: u32,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent
    pub oxygen_saturation: u32,
    /// Breaths per minute
    pub respiratory_rate: u32,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self {
            blood_pressure: "120/80".to_string(),
            heart_rate: 70,
            temperature: 36.5,
            oxygen_saturation: 98,
            respiratory_rate: 16,
        }
    }
}

impl VitalSigns {
    fn pressure_parts(&self) -> Option<(&str, &str)> {
        let (systolic, diastolic) = self.blood_pressure.split_once('/')?;
        let (systolic, diastolic) = (systolic.trim(), diastolic.trim());
        (!systolic.is_empty() && !diastolic.is_empty() && !diastolic.contains('/'))
            .then_some((systolic, diastolic))
    }
}

fn enter(value: impl Into<String>, field: &Target) -> Interaction {
    Enter::the_value(value).into_the(field.clone())
}

/// Registering a patient through the nurse dashboard wizard
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterPatient {
    name: String,
    age: u32,
    gender: String,
    identification: Option<String>,
    emergency_contact: Option<String>,
    emergency_phone: Option<String>,
    symptoms: Option<String>,
    vitals: VitalSigns,
    priority: Option<String>,
}

impl RegisterPatient {
    /// Register a patient with default gender and vital signs
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: 0,
            gender: "Masculino".to_string(),
            identification: None,
            emergency_contact: None,
            emergency_phone: None,
            symptoms: None,
            vitals: VitalSigns::default(),
            priority: None,
        }
    }

    /// Set the age
    #[must_use]
    pub const fn aged(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Set the gender option label
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    /// Set the identification number
    #[must_use]
    pub fn with_identification(mut self, identification: impl Into<String>) -> Self {
        self.identification = Some(identification.into());
        self
    }

    /// Set the emergency contact and phone
    #[must_use]
    pub fn with_emergency_contact(
        mut self,
        contact: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.emergency_contact = Some(contact.into());
        self.emergency_phone = Some(phone.into());
        self
    }

    /// Describe the symptoms
    #[must_use]
    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = Some(symptoms.into());
        self
    }

    /// Replace the vital signs
    #[must_use]
    pub fn with_vital_signs(mut self, vitals: VitalSigns) -> Self {
        self.vitals = vitals;
        self
    }

    /// Choose a priority level (`"3"` or `"P3"`)
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Patient name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The three-step registration wizard
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the priority cannot be bound.
    pub fn wizard(&self, config: &ScenarioConfig) -> ScreenplayResult<Wizard> {
        let page = NurseDashboardPage::get();
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let personal = WizardStep::titled("personal information", page.patient_name_input.clone())
            .filling(enter(self.name.clone(), &page.patient_name_input))
            .filling(enter(self.age.to_string(), &page.patient_age_input))
            .filling(
                SelectFromOptions::by_visible_text(self.gender.clone())
                    .from(page.patient_gender_select.clone()),
            )
            .filling_optional(
                non_empty(&self.identification).map(|id| enter(id, &page.patient_id_input)),
            )
            .filling_optional(
                non_empty(&self.emergency_contact)
                    .map(|contact| enter(contact, &page.emergency_contact_input)),
            )
            .filling_optional(
                non_empty(&self.emergency_phone)
                    .map(|phone| enter(phone, &page.emergency_phone_input)),
            );

        let pressure = self.vitals.pressure_parts();
        let vitals = WizardStep::titled("symptoms and vital signs", page.symptoms_textarea.clone())
            .filling_optional(
                non_empty(&self.symptoms).map(|s| enter(s, &page.symptoms_textarea)),
            )
            .filling_optional(pressure.map(|(s, _)| enter(s, &page.blood_pressure_systolic)))
            .filling_optional(pressure.map(|(_, d)| enter(d, &page.blood_pressure_diastolic)))
            .filling(enter(self.vitals.heart_rate.to_string(), &page.heart_rate_input))
            .filling(enter(self.vitals.temperature.to_string(), &page.temperature_input))
            .filling(enter(
                self.vitals.oxygen_saturation.to_string(),
                &page.oxygen_saturation_input,
            ))
            .filling(enter(
                self.vitals.respiratory_rate.to_string(),
                &page.respiratory_rate_input,
            ));

        let priority_button = non_empty(&self.priority)
            .map(|p| page.priority_button(&p))
            .transpose()?;
        let standard = config.timeouts.standard();
        let triage = WizardStep::titled("priority", page.submit_button.clone())
            .filling_optional(
                priority_button
                    .as_ref()
                    .map(|button| until(button, ElementState::Clickable, &standard)),
            )
            .filling_optional(priority_button.map(Click::on));

        Ok(Wizard::named(
            format!("fill in the registration of {}", self.name),
            page.next_button.clone(),
            page.submit_button.clone(),
        )
        .step(personal)
        .step(vitals)
        .step(triage)
        .going_back_with(page.previous_button.clone())
        .waiting_up_to(config.timeouts.standard()))
    }

    /// Build the task
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocator` if the priority cannot be bound.
    pub fn build(&self, config: &ScenarioConfig) -> ScreenplayResult<Task> {
        let page = NurseDashboardPage::get();
        Ok(Task::where_(format!("register patient {}", self.name))
            .then(until(
                &page.register_patient_button,
                ElementState::Clickable,
                &config.timeouts.standard(),
            ))
            .then(Click::on(page.register_patient_button.clone()))
            .then(self.wizard(config)?.build())
            .build())
    }
}
