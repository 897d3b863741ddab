use presente_core::config::{AppConfig, LoadOptions};
use presente_core::recommend::RecommendationStrategy;
use presente_server::bootstrap_with_config;
use serde::Serialize;

use crate::commands::{block_on, CommandResult, EXIT_CONFIG, EXIT_OK, EXIT_RUNTIME};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool, live: bool) -> CommandResult {
    run_with(LoadOptions::default(), json_output, live)
}

pub fn run_with(options: LoadOptions, json_output: bool, live: bool) -> CommandResult {
    let report = build_report(options, live);
    let exit_code = match report.checks.first() {
        Some(check) if check.status == CheckStatus::Fail => EXIT_CONFIG,
        _ if report.overall_status == CheckStatus::Fail => EXIT_RUNTIME,
        _ => EXIT_OK,
    };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };
    CommandResult { exit_code, output }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: reason.to_string() }
}

fn build_report(options: LoadOptions, live: bool) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(runtime_checks(config, live));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            let reason = "skipped because configuration did not load";
            checks.push(skipped("catalog_reachability", reason));
            checks.push(skipped("oracle_readiness", reason));
            checks.push(skipped("remote_scoring_readiness", reason));
        }
    }

    // Skipped checks are optional tiers, not failures.
    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn runtime_checks(config: AppConfig, live: bool) -> Vec<DoctorCheck> {
    let result = block_on(async move {
        let app = match bootstrap_with_config(config).await {
            Ok(app) => app,
            Err(error) => {
                return vec![DoctorCheck {
                    name: "catalog_reachability",
                    status: CheckStatus::Fail,
                    details: format!("bootstrap failed: {error}"),
                }];
            }
        };

        let mut checks = Vec::new();
        checks.push(match app.state.catalog.active_products().await {
            Ok(products) => DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Pass,
                details: format!("{} active products", products.len()),
            },
            Err(error) => DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
        });

        let ai = app.state.ai.status();
        checks.push(match ai.model {
            Some(model) if ai.configured => DoctorCheck {
                name: "oracle_readiness",
                status: CheckStatus::Pass,
                details: format!("api key present, model `{model}`"),
            },
            _ => skipped("oracle_readiness", "no oracle api key; AI stage disabled"),
        });

        checks.push(if app.state.remote.is_enabled() {
            DoctorCheck {
                name: "remote_scoring_readiness",
                status: CheckStatus::Pass,
                details: "supabase url and anon key present".to_string(),
            }
        } else {
            skipped("remote_scoring_readiness", "supabase not configured; remote stage disabled")
        });

        if live {
            checks.push(match app.state.ai.self_test().await {
                Ok(picks) => DoctorCheck {
                    name: "oracle_self_test",
                    status: CheckStatus::Pass,
                    details: format!("oracle picked: {}", picks.join(", ")),
                },
                Err(error) => DoctorCheck {
                    name: "oracle_self_test",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
            });
        }

        checks
    });

    result.unwrap_or_else(|error| {
        vec![DoctorCheck {
            name: "catalog_reachability",
            status: CheckStatus::Fail,
            details: format!("failed to initialize async runtime: {error}"),
        }]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
