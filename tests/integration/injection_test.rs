//! Identifier Injection Integration Tests

use std::collections::HashSet;

use design_studio_parser::{collect_ids, inject};

const DASHBOARD: &str = r#"import React from 'react';

// Sidebar and main panel
export default function Dashboard({ items }: { items: string[] }) {
  return (
    <div className="layout">
      <aside id="sidebar">
        <nav>
          {items.map((item) => (
            <a key={item} href={`#${item}`}>{item}</a>
          ))}
        </nav>
      </aside>
      <main id="sidebar">
        <Card title="Stats" />
        <>
          <span>Total</span>
        </>
      </main>
    </div>
  );
}
"#;

#[test]
fn test_dashboard_gets_unique_ids() {
    let result = inject(DASHBOARD, &HashSet::new(), "dashboard").unwrap();
    let ids = collect_ids(&result.rewritten_source).unwrap();

    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(result.duplicates_found, 1);
    assert_eq!(result.removed, 1);
    // div, nav, a, Card, span; plus the re-minted main
    assert_eq!(result.added, 6);
    assert!(ids.contains(&"sidebar".to_string()));
    assert!(ids.iter().filter(|id| id.starts_with("id_dashboard_")).count() == 6);
    assert!(result.rewritten_source.contains("// Sidebar and main panel"));
    assert!(result.rewritten_source.contains("<>"));
}

#[test]
fn test_second_pass_is_stable() {
    let first = inject(DASHBOARD, &HashSet::new(), "dashboard").unwrap();
    let second = inject(&first.rewritten_source, &HashSet::new(), "dashboard").unwrap();
    assert_eq!(second.rewritten_source, first.rewritten_source);
    assert_eq!(second.added, 0);
    assert_eq!(second.duplicates_found, 0);
}

#[test]
fn test_ids_claimed_by_other_files_are_reminted() {
    let existing: HashSet<String> = ["sidebar".to_string()].into_iter().collect();
    let result = inject(DASHBOARD, &existing, "dashboard").unwrap();
    let ids = collect_ids(&result.rewritten_source).unwrap();
    assert!(!ids.contains(&"sidebar".to_string()));
    assert!(ids.iter().all(|id| !existing.contains(id)));
}
