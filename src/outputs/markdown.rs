//! Markdown rendering of the dashboard.
//!
//! The report mirrors the dashboard's views, one section each: key metrics,
//! category distribution, daily activity, topic mentions, topic co-occurrence
//! and the (optionally filtered) timeline. A contents list at the top links
//! to each section.

use crate::dashboard::{Dashboard, TimelineEntry};
use crate::utils::{percent, slugify};
use std::fmt::{self, Write};

const SECTIONS: &[&str] = &[
    "Key Metrics",
    "Category Distribution",
    "Daily Activity",
    "Topic Mentions",
    "Topic Co-occurrence",
    "Timeline",
];

/// Render the full report.
pub fn dashboard_to_markdown(dashboard: &Dashboard) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail
    let _ = render(dashboard, &mut md);
    md
}

/// Output filename for a report, e.g. `2025-05-06_alerts.md`.
pub fn report_filename(dashboard: &Dashboard) -> String {
    format!("{}_alerts.md", dashboard.generated_at.date_naive())
}

fn render(d: &Dashboard, md: &mut String) -> fmt::Result {
    writeln!(md, "# News Alert Dashboard\n")?;
    writeln!(
        md,
        "_Generated {} · revision {} · {} matching_\n",
        d.generated_at.format("%Y-%m-%d %H:%M UTC"),
        d.revision,
        d.match_mode
    )?;

    for section in SECTIONS {
        writeln!(md, "- [{}](#{})", section, slugify(section))?;
    }
    writeln!(md)?;

    writeln!(md, "## Key Metrics\n")?;
    writeln!(md, "| Total Articles | Categories | Renewable News | Energy News |")?;
    writeln!(md, "|---:|---:|---:|---:|")?;
    writeln!(
        md,
        "| {} | {} | {} | {} |\n",
        d.metrics.total_records, d.metrics.categories, d.metrics.renewables, d.metrics.energy_gas
    )?;

    writeln!(md, "## Category Distribution\n")?;
    if d.categories.is_empty() {
        writeln!(md, "No articles.\n")?;
    } else {
        writeln!(md, "| Category | Articles | Share |")?;
        writeln!(md, "|---|---:|---:|")?;
        let total = d.categories.total();
        for (category, count) in d.categories.iter() {
            writeln!(md, "| {} | {} | {:.1}% |", category.label(), count, percent(count, total))?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Daily Activity\n")?;
    if d.daily.is_empty() {
        writeln!(md, "No dated articles.\n")?;
    } else {
        writeln!(md, "| Date | Articles |")?;
        writeln!(md, "|---|---:|")?;
        for day in &d.daily.ascending() {
            writeln!(md, "| {} | {} |", day.date, day.count)?;
        }
        writeln!(md)?;
    }
    if d.daily.undated() > 0 {
        writeln!(md, "> {} article(s) had an unreadable publish date and are not charted.\n", d.daily.undated())?;
    }

    writeln!(md, "## Topic Mentions\n")?;
    writeln!(md, "| Topic | Mentions |")?;
    writeln!(md, "|---|---:|")?;
    for mention in &d.topic_mentions {
        writeln!(md, "| {} | {} |", mention.topic, mention.count)?;
    }
    writeln!(md)?;

    writeln!(md, "## Topic Co-occurrence\n")?;
    if d.cooccurrence.is_empty() {
        writeln!(md, "No topic co-occurrences found in current data.\n")?;
    } else {
        writeln!(md, "| Topics | Articles |")?;
        writeln!(md, "|---|---:|")?;
        for pair in &d.cooccurrence {
            writeln!(md, "| {} ↔ {} | {} |", pair.a, pair.b, pair.count)?;
        }
        writeln!(md)?;
    }

    writeln!(md, "## Timeline\n")?;
    writeln!(md, "_Showing: {}_\n", d.filter)?;
    if d.timeline.is_empty() {
        writeln!(md, "No articles in this category.")?;
    }
    for entry in &d.timeline {
        write_timeline_entry(md, entry)?;
    }
    Ok(())
}

fn write_timeline_entry(md: &mut String, entry: &TimelineEntry) -> fmt::Result {
    let record = &entry.record.record;
    let when = match record.published.timestamp() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "undated".to_string(),
    };
    let source = record
        .source_host()
        .map(|host| format!(" <small>`{}`</small>", host))
        .unwrap_or_default();

    writeln!(
        md,
        "- **{}** · `{}` · [{}]({}){}",
        when,
        entry.record.category.label(),
        record.title,
        record.url,
        source
    )?;
    if !entry.topics.is_empty() {
        let topics = entry.topics.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ");
        writeln!(md, "    - Topics: {}", topics)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::ingest::csv::parse_feed;
    use crate::keywords::MatchMode;
    use crate::session::{CategoryFilter, SessionState};

    fn dashboard(feed: &str, filter: CategoryFilter) -> Dashboard {
        let state = SessionState::Loading
            .loaded(parse_feed(feed).records, MatchMode::Substring)
            .with_filter(filter);
        Dashboard::build(state.snapshot().unwrap())
    }

    const FEED: &str = "id,title,published,url\n\
        1,\"PETRONAS signs gas pipeline deal\",2025-01-10T00:00:00Z,https://www.thestar.com.my/a\n\
        2,\"Malaysia hydrogen push\",2025-01-11T04:00:00Z,https://www.nst.com.my/b\n\
        3,\"Board meeting\",unknown,https://example.com/c\n";

    #[test]
    fn test_sections_present() {
        let md = dashboard_to_markdown(&dashboard(FEED, CategoryFilter::All));
        for section in SECTIONS {
            assert!(md.contains(&format!("## {}", section)), "missing {section}");
        }
        assert!(md.contains("- [Topic Co-occurrence](#topic-co-occurrence)"));
    }

    #[test]
    fn test_tables_render_counts() {
        let md = dashboard_to_markdown(&dashboard(FEED, CategoryFilter::All));
        assert!(md.contains("| 3 | 3 | 1 | 1 |"));
        assert!(md.contains("| Energy & Gas | 1 | 33.3% |"));
        assert!(md.contains("| 2025-01-10 | 1 |"));
        assert!(md.contains("| Renewable ↔ Malaysia | 1 |"));
        assert!(md.contains("1 article(s) had an unreadable publish date"));
    }

    #[test]
    fn test_timeline_entries() {
        let md = dashboard_to_markdown(&dashboard(FEED, CategoryFilter::All));
        assert!(md.contains(
            "- **2025-01-11 04:00 UTC** · `Renewables` · [Malaysia hydrogen push](https://www.nst.com.my/b) <small>`www.nst.com.my`</small>"
        ));
        assert!(md.contains("    - Topics: Renewable, Malaysia"));
        assert!(md.contains("- **undated** · `Other` · [Board meeting]"));
    }

    #[test]
    fn test_filtered_timeline_and_empty_states() {
        let md = dashboard_to_markdown(&dashboard(FEED, CategoryFilter::Only(Category::Chemicals)));
        assert!(md.contains("_Showing: Chemicals_"));
        assert!(md.contains("No articles in this category."));

        let empty = dashboard_to_markdown(&dashboard("id,title,published,url\n", CategoryFilter::All));
        assert!(empty.contains("No articles.\n"));
        assert!(empty.contains("No dated articles."));
        assert!(empty.contains("No topic co-occurrences found in current data."));
    }
}
