//! The default clinical knowledge catalog.

use kairos_core::models::{AccessTier, DataSource, SourceAccess, SourceType};

use crate::catalog::Catalog;

fn open_access() -> SourceAccess {
    SourceAccess {
        tier: AccessTier::Public,
        requires_auth: false,
        ..SourceAccess::default()
    }
}

fn licensed() -> SourceAccess {
    SourceAccess {
        tier: AccessTier::Licensed,
        requires_auth: true,
        ..SourceAccess::default()
    }
}

fn general(id: &str, name: &str, source_type: SourceType, reliability: f64) -> DataSource {
    DataSource::new(id, name, source_type, reliability)
        .with_specializations(["all"])
        .with_approaches(["all"])
}

/// Research databases, guidelines, treatment protocols, clinical templates,
/// case material, ethics and legal frameworks, plus a crisis protocol.
pub fn builtin_catalog() -> Catalog {
    let sources = vec![
        // Research databases
        general("pubmed", "PubMed Central", SourceType::ResearchDatabase, 0.95)
            .with_description("Open access medical and psychological research database")
            .with_url("https://www.ncbi.nlm.nih.gov/pmc/")
            .with_access(open_access()),
        general("psycinfo", "PsycINFO", SourceType::ResearchDatabase, 0.98)
            .with_description("American Psychological Association's database")
            .with_url("https://www.apa.org/pubs/databases/psycinfo")
            .with_access(licensed()),
        // Professional guidelines
        general("apa_guidelines", "APA Guidelines", SourceType::Guideline, 0.99)
            .with_description("American Psychological Association Clinical Practice Guidelines")
            .with_url("https://www.apa.org/practice/guidelines")
            .with_access(licensed()),
        general("who_mental_health", "WHO Mental Health Guidelines", SourceType::Guideline, 0.97)
            .with_description("World Health Organization Mental Health Guidelines")
            .with_url("https://www.who.int/mental_health/")
            .with_access(open_access()),
        // Treatment protocols
        DataSource::new("cbt_manual", "CBT Treatment Manual", SourceType::Protocol, 0.96)
            .with_specializations(["anxiety", "depression", "trauma"])
            .with_approaches(["cbt", "cognitive_behavioral"])
            .with_description("Evidence-based CBT treatment protocols")
            .with_url("https://www.apa.org/pubs/books/cbt-manual")
            .with_access(licensed()),
        DataSource::new("dbt_skills", "DBT Skills Manual", SourceType::Protocol, 0.95)
            .with_specializations(["personality_disorders", "trauma"])
            .with_approaches(["dbt", "dialectical_behavioral"])
            .with_description("Dialectical Behavior Therapy skills training manual")
            .with_url("https://www.apa.org/pubs/books/dbt-manual")
            .with_access(licensed()),
        DataSource::new("crisis_protocol", "Crisis Intervention Protocol", SourceType::Protocol, 0.97)
            .with_specializations(["crisis", "suicide_prevention", "self_harm"])
            .with_approaches(["safety_planning"])
            .with_description("Suicide risk assessment, safety planning and emergency referral")
            .with_url("https://988lifeline.org/professionals/")
            .with_access(SourceAccess {
                // Safety material refreshes hourly.
                cache_duration_secs: Some(3_600),
                ..open_access()
            }),
        // Clinical documentation
        general("assessment_templates", "Clinical Assessment Templates", SourceType::ClinicalDoc, 0.94)
            .with_description("Standardized clinical assessment forms and templates")
            .with_url("https://www.apa.org/practice/assessment")
            .with_access(licensed()),
        general("progress_notes", "Progress Note Templates", SourceType::ClinicalDoc, 0.93)
            .with_description("Standardized progress note templates")
            .with_url("https://www.apa.org/practice/notes")
            .with_access(licensed()),
        // Case studies
        general("clinical_cases", "Clinical Case Database", SourceType::CaseStudy, 0.92)
            .with_description("Anonymized clinical cases and treatment outcomes")
            .with_url("https://www.apa.org/practice/cases")
            .with_access(licensed()),
        // Ethics and legal
        general("apa_ethics", "APA Ethical Guidelines", SourceType::EthicsDoc, 1.0)
            .with_description("American Psychological Association Ethical Guidelines")
            .with_url("https://www.apa.org/ethics")
            .with_access(open_access()),
        general("hipaa", "HIPAA Guidelines", SourceType::LegalDoc, 1.0)
            .with_description("Health Insurance Portability and Accountability Act")
            .with_url("https://www.hhs.gov/hipaa")
            .with_access(open_access()),
    ];
    Catalog::new(sources)
}
