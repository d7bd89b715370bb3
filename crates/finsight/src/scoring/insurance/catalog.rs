use super::domain::InsuranceTemplate;

/// Source of the insurable product catalog.
pub trait CatalogProvider: Send + Sync {
    fn templates(&self) -> Result<Vec<InsuranceTemplate>, CatalogError>;
}

/// Error enumeration for catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Built-in catalog mirroring the standard MSME product lineup.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    templates: Vec<InsuranceTemplate>,
}

impl StaticCatalog {
    pub fn new(templates: Vec<InsuranceTemplate>) -> Self {
        Self { templates }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard five-product lineup.
    pub fn standard() -> Self {
        Self::new(vec![
            template(
                "Professional Indemnity Insurance",
                "professional_indemnity",
                "HDFC ERGO",
                &["services", "consulting", "digital"],
                &["technology", "consulting", "professional_services"],
                500_000.0,
                10_000_000.0,
                15_000.0,
                "Protection against professional errors, omissions, and negligence claims",
                &["professional_liability", "errors_omissions"],
                &["errors_omissions", "legal_costs", "defense_costs"],
            ),
            template(
                "Cyber Liability Insurance",
                "cyber_liability",
                "ICICI Lombard",
                &["digital", "e-commerce", "services"],
                &["technology", "finance", "healthcare"],
                1_000_000.0,
                50_000_000.0,
                25_000.0,
                "Comprehensive protection against cyber attacks, data breaches, and digital fraud",
                &["cyber", "data_breach", "digital_fraud"],
                &["data_breach", "cyber_extortion", "business_interruption"],
            ),
            template(
                "Public Liability Insurance",
                "public_liability",
                "New India Assurance",
                &["retail", "manufacturing", "services"],
                &["retail", "hospitality", "manufacturing"],
                200_000.0,
                5_000_000.0,
                12_000.0,
                "Coverage for third-party bodily injury and property damage claims",
                &["liability", "third_party_injury", "property_damage"],
                &["third_party_injury", "property_damage", "legal_expenses"],
            ),
            template(
                "Employee Health Insurance",
                "health",
                "Star Health",
                &["services", "manufacturing", "retail", "digital"],
                &["all"],
                100_000.0,
                2_000_000.0,
                8_000.0,
                "Comprehensive health coverage for employees and their families",
                &["employee_welfare", "medical_emergencies"],
                &["cashless_treatment", "pre_existing_diseases", "maternity_cover"],
            ),
            template(
                "Fire & Theft Insurance",
                "asset_protection",
                "Oriental Insurance",
                &["retail", "manufacturing"],
                &["retail", "manufacturing", "warehousing"],
                300_000.0,
                15_000_000.0,
                10_000.0,
                "Protection against fire, theft, and burglary of business assets",
                &["fire", "theft", "burglary", "vandalism"],
                &["fire_damage", "theft_burglary", "vandalism"],
            ),
        ])
    }
}

impl CatalogProvider for StaticCatalog {
    fn templates(&self) -> Result<Vec<InsuranceTemplate>, CatalogError> {
        Ok(self.templates.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    name: &str,
    policy_type: &str,
    provider: &str,
    business_types: &[&str],
    target_industries: &[&str],
    coverage_min: f64,
    coverage_max: f64,
    base_premium: f64,
    description: &str,
    risk_tags: &[&str],
    features: &[&str],
) -> InsuranceTemplate {
    InsuranceTemplate {
        name: name.to_string(),
        policy_type: policy_type.to_string(),
        provider: provider.to_string(),
        business_types: business_types.iter().map(ToString::to_string).collect(),
        target_industries: target_industries.iter().map(ToString::to_string).collect(),
        coverage_min,
        coverage_max,
        base_premium,
        description: description.to_string(),
        regulatory_authority: "IRDAI".to_string(),
        legal_compliance: true,
        risk_tags: risk_tags.iter().map(ToString::to_string).collect(),
        features: features.iter().map(ToString::to_string).collect(),
    }
}
