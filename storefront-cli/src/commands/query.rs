use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_catalog::{
    Criterion, Field, SortDirection, SortState, days_since_epoch, parse_date,
};
use storefront_lib::{SavedView, StorefrontContext};

use crate::CliError;
use crate::cli_types::QueryArgs;

use super::log_products;

pub(crate) fn run_query(ctx: &StorefrontContext, args: QueryArgs) -> Result<(), CliError> {
    let base = if args.saved {
        ctx.saved_view()?
    } else {
        SavedView::default()
    };
    let view = build_view(base, &args)?;

    let fallback = ctx
        .store()
        .sort_plan(&view.sort)
        .is_ok_and(|plan| plan.is_fallback());
    if fallback {
        log::warn!(
            "No index on '{}', results are sorted by name",
            view.sort.field
        );
    }

    let products = ctx.query(&view)?;
    log_view(&view);
    log_products(&products);

    if args.save {
        ctx.save_view(&view)?;
        log::info!("{}", "Saved view.".if_supports_color(Stdout, |t| t.green()));
    }
    Ok(())
}

/// Apply command-line overrides on top of `base`.
pub(crate) fn build_view(mut view: SavedView, args: &QueryArgs) -> Result<SavedView, CliError> {
    for arg in &args.filters {
        let (field, values) = parse_values(arg)?;
        view.filters.set_values(field.as_str(), values);
    }
    for arg in &args.ranges {
        let (field, min, max) = parse_range(arg)?;
        view.filters.set_range(field.as_str(), min, max);
    }

    if let Some(field) = args.sort {
        view.sort = SortState::ascending(field);
    }
    if args.desc {
        view.sort.direction = SortDirection::Descending;
    }
    if let Some(term) = &args.search {
        let term = term.trim();
        view.search = (!term.is_empty()).then(|| term.to_string());
    }
    Ok(view)
}

fn split_field_arg(arg: &str) -> Result<(Field, &str), CliError> {
    let (field, rest) = arg
        .split_once('=')
        .ok_or_else(|| CliError::invalid_argument(format!("expected FIELD=..., got '{arg}'")))?;
    let field = field
        .trim()
        .parse::<Field>()
        .map_err(|e| CliError::invalid_argument(e.to_string()))?;
    Ok((field, rest))
}

/// Parse `field=a,b,c`.
fn parse_values(arg: &str) -> Result<(Field, Vec<String>), CliError> {
    let (field, rest) = split_field_arg(arg)?;
    let values = rest
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((field, values))
}

/// Parse `field=min..max`. Bounds are numbers, or ISO dates for date ranges.
fn parse_range(arg: &str) -> Result<(Field, f64, f64), CliError> {
    let (field, rest) = split_field_arg(arg)?;
    let (min, max) = rest
        .split_once("..")
        .ok_or_else(|| CliError::invalid_argument(format!("expected MIN..MAX, got '{rest}'")))?;
    let min = parse_bound(min)?;
    let max = parse_bound(max)?;
    if min > max {
        return Err(CliError::invalid_argument(format!(
            "range for '{field}' is empty ({min} > {max})"
        )));
    }
    Ok((field, min, max))
}

fn parse_bound(s: &str) -> Result<f64, CliError> {
    let s = s.trim();
    if let Ok(n) = s.parse::<f64>() {
        if !n.is_finite() {
            return Err(CliError::invalid_argument(format!(
                "'{s}' is not a finite number"
            )));
        }
        return Ok(n);
    }
    parse_date(s)
        .map(|date| days_since_epoch(date) as f64)
        .ok_or_else(|| CliError::invalid_argument(format!("'{s}' is not a number or date")))
}

fn log_view(view: &SavedView) {
    for (label, criterion) in view.filters.iter() {
        match criterion {
            Criterion::Values(values) if !values.is_empty() => {
                let values: Vec<&str> = values.iter().map(String::as_str).collect();
                log::info!("  {label}: {}", values.join(", "));
            }
            Criterion::Values(_) => {}
            Criterion::Range { min, max } => log::info!("  {label}: {min} to {max}"),
        }
    }
    if let Some(term) = &view.search {
        log::info!("  search: \"{term}\"");
    }
    let direction = match view.sort.direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    log::info!("  sort: {} {direction}", view.sort.field);
    crate::log_blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use storefront_catalog::FilterState;

    fn no_args() -> QueryArgs {
        QueryArgs::default()
    }

    #[test]
    fn parses_value_filters() {
        let (field, values) = parse_values("Vendor=Palit, MSI,").unwrap();
        assert_eq!(field, Field::Vendor);
        assert_eq!(values, vec!["Palit".to_string(), "MSI".to_string()]);
    }

    #[test]
    fn parses_numeric_ranges() {
        assert_eq!(
            parse_range("price=1000..50000").unwrap(),
            (Field::Price, 1000.0, 50000.0)
        );
    }

    #[test]
    fn parses_date_ranges_as_epoch_days() {
        let (field, min, max) = parse_range("date=1970-01-02..2021-01-01").unwrap();
        assert_eq!(field, Field::Date);
        assert_eq!(min, 1.0);
        let expected = days_since_epoch(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()) as f64;
        assert_eq!(max, expected);
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(parse_values("vendor").is_err());
        assert!(parse_values("weight=10").is_err());
        assert!(parse_range("price=10").is_err());
        assert!(parse_range("price=abc..10").is_err());
        assert!(parse_range("price=10..1").is_err());
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(parse_range("price=nan..10").is_err());
        assert!(parse_range("price=0..inf").is_err());
        assert!(parse_range("price=-infinity..0").is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_saved_view() {
        let mut saved = SavedView::default();
        saved.filters.set_values("color", ["black"]);
        saved.sort = SortState::ascending(Field::Price);
        saved.search = Some("rtx".to_string());

        let args = QueryArgs {
            filters: vec!["vendor=MSI".to_string()],
            desc: true,
            search: Some("  ".to_string()),
            ..no_args()
        };
        let view = build_view(saved, &args).unwrap();

        assert!(view.filters.get("color").is_some());
        assert!(view.filters.get("vendor").is_some());
        assert_eq!(view.sort, SortState::descending(Field::Price));
        assert_eq!(view.search, None);
    }

    #[test]
    fn sort_flag_resets_direction() {
        let args = QueryArgs {
            sort: Some(Field::Stock),
            ..no_args()
        };
        let mut saved = SavedView::default();
        saved.sort = SortState::descending(Field::Price);
        let view = build_view(saved, &args).unwrap();
        assert_eq!(view.sort, SortState::ascending(Field::Stock));
    }

    #[test]
    fn empty_args_leave_view_unchanged() {
        let view = build_view(SavedView::default(), &no_args()).unwrap();
        assert_eq!(view, SavedView::default());
        assert!(view.filters.is_empty());
        assert_eq!(view.filters, FilterState::new());
    }
}
