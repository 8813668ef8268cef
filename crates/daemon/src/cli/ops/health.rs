use std::fmt;

use clap::Args;

use sharegate_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

/// Local state files plus the daemon's status probes
#[derive(Debug)]
pub struct HealthReport {
    local: Result<Vec<(&'static str, String)>, String>,
    remote: String,
    probes: Vec<(&'static str, String)>,
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        match &self.local {
            Ok(rows) => {
                for (key, value) in rows {
                    writeln!(f, "  {:<12} {}", format!("{}:", key), value)?;
                }
            }
            Err(e) => writeln!(f, "  error: {}", e)?,
        }

        writeln!(f)?;
        write!(f, "Daemon ({}):", self.remote)?;
        for (probe, status) in &self.probes {
            write!(f, "\n  {:<7} {}", format!("{}:", probe), status)?;
        }
        Ok(())
    }
}

fn presence(path: &std::path::Path) -> String {
    let status = if path.exists() { "OK" } else { "MISSING" };
    status.to_string()
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = std::convert::Infallible;
    type Output = HealthReport;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<HealthReport, Self::Error> {
        let local = AppState::load(ctx.config_path.clone())
            .map(|state| {
                vec![
                    ("directory", state.state_dir.display().to_string()),
                    ("config.toml", "OK".to_string()),
                    ("db.sqlite", presence(&state.db_path)),
                    ("secret.key", presence(&state.secret_path)),
                    ("api_port", state.config.api_port.to_string()),
                    ("public_url", state.config.public_url.to_string()),
                ]
            })
            .map_err(|e| e.to_string());

        let base = ctx.client.base_url();
        let mut probes = Vec::new();
        for probe in ["livez", "readyz"] {
            let status = match base.join(&format!("_status/{}", probe)) {
                Ok(url) => match ctx.client.http_client().get(url).send().await {
                    Ok(resp) if resp.status().is_success() => "OK".to_string(),
                    Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                    Err(_) => "NOT REACHABLE".to_string(),
                },
                Err(e) => format!("BAD URL ({})", e),
            };
            probes.push((probe, status));
        }

        Ok(HealthReport {
            local,
            remote: base.to_string(),
            probes,
        })
    }
}
