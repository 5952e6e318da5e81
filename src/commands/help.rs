use crate::models::ChartSpec;

/// Usage text for the date-selection prompt
pub fn help_text(charts: &[ChartSpec]) -> String {
    let mut text = String::from(
        "📖 Merval Snapshot\n\
         Enter a reference date to build the snapshot and render the charts.\n\n\
         `YYYY-MM-DD` - Select a date between 2000-01-01 and today\n\
         `today`      - Select today\n\
         `help`       - Show this help message\n\
         `quit`       - Exit\n\n\
         Selecting a new date abandons the build in progress.\n\
         Charts:\n",
    );

    for spec in charts {
        text.push_str(&format!("  • {} - {}\n", spec.name, spec.title));
    }

    text
}
