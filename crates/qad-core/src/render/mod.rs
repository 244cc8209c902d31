//! Consolidated dashboard page, built as a single HTML string with
//! embedded CSS. Sections are emitted only when enabled for the run.

pub mod charts;
pub mod progress;

use crate::error::Result;
use crate::history::HistoryRow;
use crate::paths;
use crate::results::{DashboardData, RepoMetrics};
use crate::types::Environment;
use std::path::Path;

/// Escape text destined for HTML body or attribute positions. Everything
/// that reaches the renderer from config or remote systems goes through
/// here.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body{font-family:sans-serif;margin:2em;color:#222}\
h1{margin-bottom:0}\
.meta{color:#666;margin-bottom:2em}\
table{border-collapse:collapse;margin:1em 0 2em}\
th,td{border:1px solid #ccc;padding:6px 10px;text-align:left}\
th{background:#f3f3f3}\
.ok{color:#1a7f37;font-weight:bold}\
.fail{color:#c61a1a;font-weight:bold}\
.badge-success{background:#1a7f37;color:#fff;padding:2px 6px;border-radius:3px}\
.badge-warning{background:#b58900;color:#fff;padding:2px 6px;border-radius:3px}\
.badge-danger{background:#c61a1a;color:#fff;padding:2px 6px;border-radius:3px}\
.badge-info{background:#2a6fb0;color:#fff;padding:2px 6px;border-radius:3px}\
.badge-secondary{background:#777;color:#fff;padding:2px 6px;border-radius:3px}\
.badge-light{background:#ddd;color:#222;padding:2px 6px;border-radius:3px}\
.bar{background:#eee;width:120px;height:14px;display:inline-block}\
.bar span{display:block;height:100%}\
.bar-danger{background:#c61a1a}\
.bar-warning{background:#b58900}\
.bar-info{background:#2a6fb0}\
.bar-success{background:#1a7f37}\
.remarks{margin:0;padding-left:1.2em;color:#864}\
.chart{width:400px;height:120px;margin-right:1em}\
.chart-label{font-size:10px;fill:#666}\
";

// ---------------------------------------------------------------------------
// Page assembly
// ---------------------------------------------------------------------------

/// Render the full dashboard page.
pub fn render_dashboard(data: &DashboardData, history: &[HistoryRow]) -> String {
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>QA Dashboard — {}</title>\n",
        escape(&data.project)
    ));
    out.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    render_header(&mut out, data);

    if data.sections.liveness {
        render_liveness(&mut out, data);
    }
    if data.sections.ci_jobs {
        render_smoke(&mut out, data);
        render_ci_jobs(&mut out, data);
    }
    if data.sections.code_quality {
        render_code_quality(&mut out, data);
        render_trends(&mut out, data, history);
    }
    if data.sections.sla {
        render_sla(&mut out, data);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_header(out: &mut String, data: &DashboardData) {
    out.push_str(&format!("<h1>QA Dashboard — {}</h1>\n", escape(&data.project)));
    out.push_str("<p class=\"meta\">");
    out.push_str(&format!(
        "generated {}",
        data.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(sprint) = &data.sprint {
        out.push_str(&format!(" · sprint {}", escape(sprint)));
    }
    if let Some(url) = &data.sprint_plan_url {
        out.push_str(&format!(
            " · <a href=\"{}\">sprint plan</a>",
            escape(url)
        ));
    }
    for team in &data.teams {
        if let Some(url) = data.issue_trackers.get(team) {
            out.push_str(&format!(
                " · <a href=\"{}\">{} issues</a>",
                escape(url),
                escape(team)
            ));
        }
    }
    out.push_str("</p>\n");
}

fn flag(out: &mut String, value: bool) {
    if value {
        out.push_str("<td class=\"ok\">ok</td>");
    } else {
        out.push_str("<td class=\"fail\">down</td>");
    }
}

fn render_liveness(out: &mut String, data: &DashboardData) {
    out.push_str("<h2>Service liveness</h2>\n<table>\n");
    out.push_str(
        "<tr><th>environment</th><th>API</th><th>jobs API</th>\
         <th>API token</th><th>jobs token</th></tr>\n",
    );
    for env in Environment::all() {
        let Some(check) = data.liveness.get(&env) else {
            continue;
        };
        out.push_str(&format!("<tr><td>{}</td>", env.as_str()));
        flag(out, check.api_available);
        flag(out, check.jobs_api_available);
        flag(out, check.api_token_valid);
        flag(out, check.jobs_token_valid);
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn render_smoke(out: &mut String, data: &DashboardData) {
    let Some(smoke) = &data.smoke else {
        return;
    };
    out.push_str(&format!(
        "<p>Production smoke tests: {} of {} builds succeeded ({}%).</p>\n",
        smoke.succeeded,
        smoke.total,
        smoke.success_rate()
    ));
}

fn render_ci_jobs(out: &mut String, data: &DashboardData) {
    out.push_str("<h2>CI jobs</h2>\n<table>\n<tr><th>repository</th>");
    for job_type in crate::types::JobType::all() {
        out.push_str(&format!("<th>{}</th>", job_type.as_str()));
    }
    out.push_str("</tr>\n");

    for (repo, metrics) in &data.repos {
        out.push_str(&format!("<tr><td>{}</td>", escape(repo)));
        for entry in &metrics.ci_jobs {
            match entry.status {
                Some(status) => out.push_str(&format!(
                    "<td><a href=\"{}\"><span class=\"{}\">{}</span></a></td>",
                    escape(&entry.url),
                    status.badge_class(),
                    status.as_str()
                )),
                None => out.push_str("<td>—</td>"),
            }
        }
        // repos collected with ci_jobs disabled have no entries
        for _ in metrics.ci_jobs.len()..crate::types::JobType::all().len() {
            out.push_str("<td>—</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn progress_cell(out: &mut String, percent: u32) {
    out.push_str(&format!(
        "<td><span class=\"bar\"><span class=\"{}\" style=\"width:{}%\"></span></span> {}%</td>",
        progress::bar_class(percent),
        progress::bar_width(percent),
        percent
    ));
}

fn check_cell(out: &mut String, report: &crate::checks::CheckReport) {
    if report.configured() {
        progress_cell(out, report.percent_passed());
    } else {
        out.push_str("<td>not set up</td>");
    }
}

fn rank_cell(out: &mut String, tally: &crate::complexity::RankTally) {
    match tally.worst_rank() {
        Some(rank) => out.push_str(&format!("<td>{rank}</td>")),
        None => out.push_str("<td>—</td>"),
    }
}

fn render_code_quality(out: &mut String, data: &DashboardData) {
    out.push_str("<h2>Code quality</h2>\n<table>\n");
    out.push_str(
        "<tr><th>repository</th><th>files</th><th>lines</th><th>linter</th>\
         <th>docstyle</th><th>coverage</th><th>CC</th><th>MI</th>\
         <th>dead code</th><th>common errors</th><th>status</th></tr>\n",
    );

    for (repo, metrics) in &data.repos {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td>",
            escape(repo),
            metrics.source.files,
            metrics.source.total_lines
        ));
        check_cell(out, &metrics.lint);
        check_cell(out, &metrics.docstyle);
        match metrics.coverage {
            Some(percent) => progress_cell(out, percent),
            None => out.push_str("<td>not measured</td>"),
        }
        rank_cell(out, &metrics.cyclomatic);
        rank_cell(out, &metrics.maintainability);
        check_cell(out, &metrics.dead_code);
        check_cell(out, &metrics.common_errors);
        if metrics.verdict.ok {
            out.push_str("<td class=\"ok\">✓</td>");
        } else {
            out.push_str("<td class=\"fail\">✗</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");

    render_remarks(out, data);
}

fn render_remarks(out: &mut String, data: &DashboardData) {
    let with_remarks: Vec<(&String, &RepoMetrics)> = data
        .repos
        .iter()
        .filter(|(_, m)| !m.verdict.remarks.is_empty())
        .collect();
    if with_remarks.is_empty() {
        return;
    }

    out.push_str("<h3>Remarks</h3>\n");
    for (repo, metrics) in with_remarks {
        out.push_str(&format!("<h4>{}</h4>\n<ul class=\"remarks\">\n", escape(repo)));
        for remark in &metrics.verdict.remarks {
            out.push_str(&format!("<li>{}</li>\n", escape(&remark.to_string())));
        }
        out.push_str("</ul>\n");
    }
}

fn render_trends(out: &mut String, data: &DashboardData, history: &[HistoryRow]) {
    if history.len() < 2 {
        return;
    }
    out.push_str("<h2>Trends</h2>\n");
    for (index, repo) in data.repos.keys().enumerate() {
        let repo_charts = charts::repo_trend_charts(history, index);
        if repo_charts.is_empty() {
            continue;
        }
        out.push_str(&format!("<h4>{}</h4>\n<div>", escape(repo)));
        for chart in repo_charts {
            out.push_str(&chart);
        }
        out.push_str("</div>\n");
    }
}

fn render_sla(out: &mut String, data: &DashboardData) {
    if data.perf.is_empty() {
        return;
    }
    out.push_str("<h2>Performance / SLA</h2>\n<table>\n");
    out.push_str(
        "<tr><th>test</th><th>samples</th><th>min (ms)</th><th>mean (ms)</th>\
         <th>max (ms)</th><th>SLA</th></tr>\n",
    );
    for stat in &data.perf {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td><td>{:.1}</td><td>{:.1}</td>",
            escape(&stat.label),
            stat.samples,
            stat.min,
            stat.mean,
            stat.max
        ));
        match stat.within_sla {
            Some(true) => out.push_str("<td class=\"ok\">within</td>"),
            Some(false) => out.push_str("<td class=\"fail\">violated</td>"),
            None => out.push_str("<td>—</td>"),
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// Write the rendered page to `.qad/dashboard/index.html`.
pub fn write_output(root: &Path, html: &str) -> Result<()> {
    crate::io::atomic_write(&paths::dashboard_html(root), html.as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
