use crate::infra::InMemoryPolicyRepository;
use clap::Args;
use claimguard::analysis::{AnalysisError, PolicyCategory, PolicyDocument, UserProfile};
use claimguard::claims::ClaimSimulation;
use claimguard::config::AppConfig;
use claimguard::error::AppError;
use claimguard::policies::{OwnerId, Policy, PolicyReport, PolicyService};
use std::path::PathBuf;
use std::sync::Arc;

const CLI_OWNER: &str = "cli";

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Plain-text file produced by a PDF text extractor
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Policyholder age in years (defaults to CLAIMGUARD_DEFAULT_AGE)
    #[arg(long, value_parser = parse_age)]
    pub(crate) age: Option<u32>,
    /// Pre-existing condition, if any
    #[arg(long)]
    pub(crate) disease: Option<String>,
    /// Declared policy category, e.g. "Health Insurance"
    #[arg(long)]
    pub(crate) policy_type: Option<String>,
    /// Page count reported by the extractor
    #[arg(long, default_value_t = 1)]
    pub(crate) pages: u32,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    #[command(flatten)]
    pub(crate) document: AnalyzeArgs,
    /// Claim amount in rupees (defaults to CLAIMGUARD_DEFAULT_CLAIM_AMOUNT)
    #[arg(long)]
    pub(crate) claim_amount: Option<f64>,
}

fn parse_age(raw: &str) -> Result<u32, AnalysisError> {
    UserProfile::parse_age(raw)
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let (_, policy) = analyze_file(args)?;
    print!("{}", render_analysis(&policy));
    Ok(())
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        document,
        claim_amount,
    } = args;
    let (service, policy) = analyze_file(document)?;
    let owner = OwnerId(CLI_OWNER.to_string());
    let simulation = service.simulate_claim(&owner, &policy.id, claim_amount)?;
    print!("{}", render_analysis(&policy));
    print!("{}", render_simulation(&simulation));
    Ok(())
}

pub(crate) fn run_types() -> Result<(), AppError> {
    for category in PolicyCategory::ALL {
        println!("{}", category.label());
    }
    Ok(())
}

fn analyze_file(
    args: AnalyzeArgs,
) -> Result<(PolicyService<InMemoryPolicyRepository>, Policy), AppError> {
    let config = AppConfig::load()?;
    let text = std::fs::read_to_string(&args.file)?;
    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let service = PolicyService::new(
        Arc::new(InMemoryPolicyRepository::default()),
        config.analysis,
    );
    let profile = service.profile(args.age, args.disease, args.policy_type)?;
    let document = PolicyDocument::new(text, args.pages, filename);
    let policy = service.analyze(&OwnerId(CLI_OWNER.to_string()), &document, &profile)?;
    Ok((service, policy))
}

pub(crate) fn render_analysis(policy: &Policy) -> String {
    let mut output = PolicyReport::from_policy(policy).render_text();

    if !policy.type_candidates.is_empty() {
        output.push_str("\nDetected categories\n");
        for candidate in &policy.type_candidates {
            output.push_str(&format!(
                "- {}: {:.1}% ({})\n",
                candidate.policy_type,
                candidate.confidence,
                candidate.matched_keywords.join(", ")
            ));
        }
    }

    output.push_str(&format!(
        "\nQuality: clarity {}, comprehensiveness {}, transparency {}\n",
        policy.quality.clarity, policy.quality.comprehensiveness, policy.quality.transparency
    ));
    output
}

pub(crate) fn render_simulation(simulation: &ClaimSimulation) -> String {
    format!(
        "\nClaim simulation\n\
         - Claim amount: Rs. {:.0}\n\
         - Deductible applied: Rs. {:.0}\n\
         - Co-pay applied: Rs. {:.0}\n\
         - Insurer pays: Rs. {:.0}\n\
         - You pay: Rs. {:.0}\n\
         - Coverage: {:.1}%\n",
        simulation.claim_amount,
        simulation.deductible_applied,
        simulation.copay_applied,
        simulation.insurer_pays,
        simulation.out_of_pocket,
        simulation.coverage_percentage
    )
}
