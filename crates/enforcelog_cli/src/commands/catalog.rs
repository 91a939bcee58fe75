//! Read-only listings of the fixed taxonomy and the roster.

use enforcelog_core::{Category, Roster};

pub fn taxonomy() -> anyhow::Result<()> {
    for category in Category::ALL {
        println!("{}", category.label());
        for activity in category.activities() {
            println!("  - {activity}");
        }
    }
    Ok(())
}

pub fn roster(roster: &Roster) -> anyhow::Result<()> {
    for name in roster.names() {
        println!("{name}");
    }
    Ok(())
}
