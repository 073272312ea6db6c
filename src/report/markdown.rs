//! Markdown rendering of plan reports.
//!
//! The output is a pure function of the report: no timestamps, no
//! environment-dependent text. Repeated runs over the same plans produce
//! byte-identical comments.

use std::fmt::Write;

use crate::planner::{ChangeType, IdentifiedPlan, MultiPlanReport, PlanReport, BUCKET_ORDER};

use super::{NO_CHANGES_ACROSS_ALL_PLANS, NO_CHANGES_MESSAGE, PLAN_SUMMARY_HEADER};

/// Integer subtraction for index arithmetic in the renderer.
///
/// Saturates at zero so an empty list never underflows.
#[must_use]
pub const fn sub(a: usize, b: usize) -> usize {
    a.saturating_sub(b)
}

/// Renders the full comment body for a multi-plan report.
#[must_use]
pub fn render_markdown(report: &MultiPlanReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{PLAN_SUMMARY_HEADER}\n");

    if !report.has_changes {
        let _ = writeln!(output, "{NO_CHANGES_ACROSS_ALL_PLANS}");
        return output;
    }

    let last = sub(report.plans.len(), 1);
    for plan in &report.plans {
        render_plan(&mut output, plan);
        if plan.identity.index < last {
            output.push_str("\n---\n\n");
        }
    }

    output
}

fn render_plan(output: &mut String, plan: &IdentifiedPlan) {
    let _ = writeln!(output, "### {}\n", plan.identity.name);
    let _ = writeln!(output, "`{}`\n", plan.identity.source_path);

    if !plan.report.has_changes {
        let _ = writeln!(output, "{NO_CHANGES_MESSAGE}");
        return;
    }

    let _ = writeln!(output, "{}\n", summary_line(&plan.report));

    for change_type in BUCKET_ORDER {
        let bucket = plan.report.bucket(change_type);
        if bucket.is_empty() {
            continue;
        }

        let _ = writeln!(output, "<details>");
        let _ = writeln!(
            output,
            "<summary>{} ({})</summary>\n",
            bucket_title(change_type),
            bucket.len()
        );
        let mut block = String::new();
        for (i, resource) in bucket.iter().enumerate() {
            if i > 0 {
                block.push('\n');
            }
            let _ = writeln!(block, "# {}", resource.address);
            let lines = resource.formatted_diffs();
            if lines.is_empty() {
                block.push_str("  (no attribute changes)\n");
            }
            for line in lines {
                let _ = writeln!(block, "{line}");
            }
        }
        let fence = code_fence(&block);
        let _ = write!(output, "{fence}diff\n{block}{fence}\n\n</details>\n\n");
    }
}

/// Backtick fence longer than any backtick run inside `block`.
fn code_fence(block: &str) -> String {
    let longest = block
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// One-line change counts for a plan.
#[must_use]
pub fn summary_line(report: &PlanReport) -> String {
    format!(
        "**Plan:** {} to create, {} to update, {} to recreate, {} to delete.",
        report.created.len(),
        report.updated.len(),
        report.recreated.len(),
        report.deleted.len()
    )
}

const fn bucket_title(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Create => "Create",
        ChangeType::Update => "Update",
        ChangeType::Recreate => "Recreate",
        ChangeType::Delete => "Delete",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{process_documents, PlanDocument};

    fn report(documents: &[(&str, &str)]) -> MultiPlanReport {
        let parsed: Vec<(PlanDocument, &str)> = documents
            .iter()
            .map(|(path, body)| (PlanDocument::from_slice(body.as_bytes()).unwrap(), *path))
            .collect();
        process_documents(parsed).unwrap()
    }

    const NETWORK: &str = r#"{"format_version": "1.2", "resource_changes": [
        {"address": "aws_instance.web", "change": {"actions": ["create"], "before": null, "after": {"ami": "ami-123"}}},
        {"address": "aws_instance.db", "change": {"actions": ["delete"], "before": {"ami": "ami-000"}, "after": null}},
        {"address": "aws_db_instance.main", "change": {
            "actions": ["update"],
            "before": {"password": "old", "size": 10},
            "after": {"password": "new", "size": 20},
            "after_sensitive": {"password": true}
        }}
    ]}"#;
    const EMPTY: &str = r#"{"format_version": "1.2", "resource_changes": []}"#;

    #[test]
    fn test_sub() {
        assert_eq!(sub(5, 1), 4);
        assert_eq!(sub(0, 1), 0);
    }

    #[test]
    fn test_no_changes_keeps_header() {
        let body = render_markdown(&report(&[("a.json", EMPTY), ("b.json", EMPTY)]));
        assert!(body.starts_with(PLAN_SUMMARY_HEADER));
        assert!(body.contains(NO_CHANGES_ACROSS_ALL_PLANS));
        assert!(!body.contains("###"));
    }

    #[test]
    fn test_single_plan_rendering() {
        let body = render_markdown(&report(&[("plans/network.json", NETWORK)]));

        let expected = "\
## Terraform Plan Summary

### network

`plans/network.json`

**Plan:** 1 to create, 1 to update, 0 to recreate, 1 to delete.

<details>
<summary>Create (1)</summary>

```diff
# aws_instance.web
+ami: \"ami-123\"
```

</details>

<details>
<summary>Update (1)</summary>

```diff
# aws_db_instance.main
-size: 10
+size: 20
```

</details>

<details>
<summary>Delete (1)</summary>

```diff
# aws_instance.db
-ami: \"ami-000\"
```

</details>

";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_plans_separated_without_trailing_rule() {
        let body = render_markdown(&report(&[
            ("plans/network.json", NETWORK),
            ("plans/dns.json", EMPTY),
        ]));
        assert_eq!(body.matches("\n---\n").count(), 1);
        assert!(body.contains("### dns\n\n`plans/dns.json`\n\nNo changes detected.\n"));
        assert!(!body.trim_end().ends_with("---"));
        assert!(body.find("### network") < body.find("### dns"));
    }

    #[test]
    fn test_backticks_in_values_lengthen_fence() {
        let plan = r#"{"format_version": "1.2", "resource_changes": [
            {"address": "aws_instance.web", "change": {"actions": ["create"], "after": {"user_data": "```\nrun.sh\n````"}}}
        ]}"#;
        let body = render_markdown(&report(&[("web.json", plan)]));
        assert!(body.contains("\n`````diff\n# aws_instance.web\n"));
        assert!(body.contains("\n`````\n\n</details>"));
        assert_eq!(code_fence("+a: 1\n"), "```");
        assert_eq!(code_fence("+a: \"``x```\"\n"), "````");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let docs = [("plans/network.json", NETWORK), ("plans/dns.json", EMPTY)];
        assert_eq!(render_markdown(&report(&docs)), render_markdown(&report(&docs)));
    }
}
