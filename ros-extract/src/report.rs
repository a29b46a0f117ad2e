use std::path::PathBuf;

use colored::Colorize;

use crate::env::DEFAULT_VLAN_IDS;
use crate::inference::Inference;
use crate::roles::Role;

/// Render inferred roles, networks, port groups and diagnostics for the terminal.
pub fn render_inference(inference: &Inference) -> String {
    let mut out = Vec::new();

    out.push("roles".bold().to_string());
    if inference.roles.is_empty() {
        out.push("- none".dimmed().to_string());
    }
    for (role, vlan_id) in inference.roles.iter() {
        let network = inference.networks.network(role).unwrap_or("-");
        out.push(format!("- {role}: vlan={vlan_id} network={network}"));
    }

    out.push(String::new());
    out.push("ports".bold().to_string());
    out.push(format!("- uplink: {}", list(&inference.ports.uplink)));
    out.push(format!("- trunk: {}", list(&inference.ports.trunk)));
    out.push(format!("- access: {}", list(&inference.ports.access)));

    out.push(String::new());
    if inference.diagnostics.is_empty() {
        out.push("diagnostics: none".green().to_string());
    } else {
        out.push(format!("diagnostics: {}", inference.diagnostics.len()).yellow().to_string());
        for diagnostic in &inference.diagnostics {
            out.push(format!("- {diagnostic}").yellow().to_string());
        }
    }

    out.join("\n")
}

/// Core roles that were not found, so the env file carries their default VLAN id.
pub fn defaulted_roles(inference: &Inference) -> Vec<Role> {
    DEFAULT_VLAN_IDS
        .into_iter()
        .map(|(role, _)| role)
        .filter(|role| inference.roles.vlan_id(*role).is_none())
        .collect()
}

/// One artifact of an extract run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub kind: &'static str,
    pub path: PathBuf,
    pub error: Option<String>,
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary printed after `extract`, including follow-up commands for the
/// generated files.
pub fn render_extract_summary(
    host: &str,
    outcomes: &[ArtifactOutcome],
    defaulted: &[Role],
) -> String {
    let mut out = Vec::new();
    out.push(format!("Extraction from {host}").bold().to_string());
    if !defaulted.is_empty() {
        let names: Vec<&str> = defaulted.iter().map(|role| role.as_str()).collect();
        out.push(
            format!("default VLAN ids used for: {}", names.join(", "))
                .yellow()
                .to_string(),
        );
    }
    for outcome in outcomes {
        match &outcome.error {
            None => out.push(format!(
                "{} {}: {}",
                "ok".green(),
                outcome.kind,
                outcome.path.display()
            )),
            Some(err) => out.push(format!(
                "{} {}: {} ({err})",
                "failed".red(),
                outcome.kind,
                outcome.path.display()
            )),
        }
    }

    let written = |kind: &str| outcomes.iter().find(|o| o.kind == kind && o.is_written());
    let script = written("script");
    let env = written("env");
    if script.is_some() || env.is_some() {
        out.push(String::new());
        out.push("Next steps".bold().to_string());
    }
    if let Some(script) = script {
        let path = script.path.display();
        let name = script
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push(format!("- review the script: less {path}"));
        out.push(format!("- upload it: scp {path} admin@{host}:/"));
        out.push(format!("- apply it on the device: /import file-name={name}"));
    }
    if let Some(env) = env {
        out.push(format!(
            "- provision with it: ./provision-mikrotik-vcf.sh -c {}",
            env.path.display()
        ));
    }

    out.join("\n")
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(",")
    }
}
