use anyhow::Result;
use chrono::Local;
use ros_extract::env::{render_env, Connection};
use ros_extract::script::{render_script, to_text};

use crate::cli::{EnvArgs, ScriptArgs};
use crate::pipeline::{analyze, load_snapshot, provenance, resolve_host};

pub fn run_script(args: ScriptArgs) -> Result<()> {
    let config = load_snapshot(&args.snapshot)?;
    let host = resolve_host(args.host.as_deref(), &config);
    print!("{}", to_text(&render_script(&config, &provenance(&host, &Local::now()))));
    Ok(())
}

pub fn run_env(args: EnvArgs) -> Result<()> {
    let analysis = analyze(&args.snapshot)?;
    let host = resolve_host(args.device.host.as_deref(), &analysis.config);
    let connection = Connection {
        host: host.clone(),
        username: args.device.username,
    };
    let inference = &analysis.inference;
    let document = render_env(
        &analysis.config,
        &inference.roles,
        &inference.networks,
        &inference.ports,
        &connection,
        &provenance(&host, &Local::now()),
    );
    print!("{}", document.to_text());
    Ok(())
}
