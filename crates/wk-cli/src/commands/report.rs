//! Report command for a project's time by day or by week.
//!
//! This module implements `wk report` with paging (--position, --size),
//! registered-time filtering (--not-registered), and output formats
//! (human-readable, JSON).

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use serde::Serialize;
use wk_core::{
    FindProjects, HoursMinutesFormat, LoadRange, Milliseconds, Page, Project, TimeIntervalState,
    TimeReportDay, TimeReportItem, TimeReportWeek, TimeReports,
};

use crate::store::Store;

/// Options for `wk report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Group by day instead of by week.
    pub by_day: bool,
    /// Leave registered time out regardless of settings.
    pub not_registered: bool,
    pub json: bool,
    pub range: LoadRange,
    pub format: HoursMinutesFormat,
}

/// One page of report data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPage {
    Days(Page<TimeReportDay>),
    Weeks(Page<TimeReportWeek>),
}

impl ReportPage {
    const fn unit(&self) -> &'static str {
        match self {
            Self::Days(_) => "days",
            Self::Weeks(_) => "weeks",
        }
    }

    const fn counts(&self) -> (usize, usize, usize) {
        match self {
            Self::Days(page) => (page.position.value(), page.items.len(), page.total_count),
            Self::Weeks(page) => (page.position.value(), page.items.len(), page.total_count),
        }
    }
}

// ========== Report Generation ==========

/// Loads the requested page of days or weeks.
pub fn generate_report_page<Tz: TimeZone>(
    store: &Store,
    project: &Project,
    options: &ReportOptions,
    tz: Tz,
) -> ReportPage {
    let reports = TimeReports::new(&store.intervals, &store.settings, tz);
    let range = options.range;

    match (options.by_day, options.not_registered) {
        (true, false) => ReportPage::Days(reports.load_days(project, range)),
        (false, false) => ReportPage::Weeks(reports.load_weeks(project, range)),
        (true, true) => ReportPage::Days(Page {
            position: range.position,
            total_count: reports.count_not_registered(project),
            items: reports.find_not_registered(project, range),
        }),
        (false, true) => ReportPage::Weeks(Page {
            position: range.position,
            total_count: reports.count_not_registered_weeks(project),
            items: reports.find_not_registered_weeks(project, range),
        }),
    }
}

// ========== Text Output ==========

const fn registered_marker(is_registered: bool) -> &'static str {
    if is_registered { " [registered]" } else { "" }
}

fn write_item<Tz>(
    output: &mut String,
    indent: &str,
    item: &TimeReportItem,
    now: Milliseconds,
    tz: &Tz,
    format: HoursMinutesFormat,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let marker = match item.state() {
        TimeIntervalState::Active => " [active]",
        TimeIntervalState::Inactive { .. } => "",
        TimeIntervalState::Registered { .. } => " [registered]",
    };
    writeln!(
        output,
        "{indent}#{} {}  {}{marker}",
        item.id(),
        item.title(tz),
        format.format(item.time_summary(now))
    )
    .unwrap();
}

fn write_day<Tz>(
    output: &mut String,
    indent: &str,
    day: &TimeReportDay,
    now: Milliseconds,
    tz: &Tz,
    format: HoursMinutesFormat,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    writeln!(
        output,
        "{indent}{}  {}{}",
        day.title(),
        day.time_summary_with_difference(now, format),
        registered_marker(day.is_registered())
    )
    .unwrap();
    let item_indent = format!("{indent}  ");
    for item in &day.items {
        write_item(output, &item_indent, item, now, tz, format);
    }
}

/// Formats the human-readable report output.
pub fn format_report<Tz>(
    project: &Project,
    page: &ReportPage,
    now: Milliseconds,
    tz: &Tz,
    format: HoursMinutesFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut output = String::new();
    let unit = page.unit();
    let (position, len, total) = page.counts();

    if total == 0 {
        writeln!(output, "No time recorded for {}.", project.name).unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'wk clock in {}' to start tracking.",
            project.name
        )
        .unwrap();
        return output;
    }

    if len == 0 {
        writeln!(
            output,
            "{}: no {unit} at position {position} ({total} total)",
            project.name
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "{}: {unit} {}-{} of {total}",
        project.name,
        position + 1,
        position + len
    )
    .unwrap();

    match page {
        ReportPage::Days(page) => {
            writeln!(output).unwrap();
            for day in &page.items {
                write_day(&mut output, "", day, now, tz, format);
            }
        }
        ReportPage::Weeks(page) => {
            for week in &page.items {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "{}  {}{}",
                    week.title(),
                    format.format(week.time_summary(now)),
                    registered_marker(week.is_registered())
                )
                .unwrap();
                for day in &week.days {
                    write_day(&mut output, "  ", day, now, tz, format);
                }
            }
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub timezone: String,
    pub project: String,
    pub position: usize,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<JsonWeek>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<JsonDay>>,
}

#[derive(Debug, Serialize)]
pub struct JsonWeek {
    pub start: String,
    pub title: String,
    pub time_summary: String,
    pub registered: bool,
    pub days: Vec<JsonDay>,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    pub title: String,
    pub time_summary: String,
    pub time_difference: String,
    pub registered: bool,
    pub items: Vec<JsonItem>,
}

#[derive(Debug, Serialize)]
pub struct JsonItem {
    pub id: i64,
    pub state: &'static str,
    pub start: String,
    pub stop: Option<String>,
    pub time_summary: String,
}

struct JsonContext<'a, Tz> {
    now: Milliseconds,
    tz: &'a Tz,
    format: HoursMinutesFormat,
}

impl<Tz> JsonContext<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn item(&self, item: &TimeReportItem) -> JsonItem {
        let interval = item.interval();
        JsonItem {
            id: item.id().value(),
            state: item.state().as_str(),
            start: interval.start().in_zone(self.tz).to_rfc3339(),
            stop: interval.stop().map(|stop| stop.in_zone(self.tz).to_rfc3339()),
            time_summary: self.format.format(item.time_summary(self.now)),
        }
    }

    fn day(&self, day: &TimeReportDay) -> JsonDay {
        JsonDay {
            date: day.date.format("%Y-%m-%d").to_string(),
            title: day.title(),
            time_summary: self.format.format(day.time_summary(self.now)),
            time_difference: self.format.format(day.time_difference(self.now)),
            registered: day.is_registered(),
            items: day.items.iter().map(|item| self.item(item)).collect(),
        }
    }

    fn week(&self, week: &TimeReportWeek) -> JsonWeek {
        JsonWeek {
            start: week.start.format("%Y-%m-%d").to_string(),
            title: week.title(),
            time_summary: self.format.format(week.time_summary(self.now)),
            registered: week.is_registered(),
            days: week.days.iter().map(|day| self.day(day)).collect(),
        }
    }
}

/// Formats report data as JSON.
pub fn format_report_json<Tz>(
    project: &Project,
    page: &ReportPage,
    now: Milliseconds,
    tz: &Tz,
    timezone: &str,
    format: HoursMinutesFormat,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let context = JsonContext { now, tz, format };
    let (position, _, total_count) = page.counts();
    let (weeks, days) = match page {
        ReportPage::Weeks(page) => (
            Some(page.items.iter().map(|week| context.week(week)).collect()),
            None,
        ),
        ReportPage::Days(page) => (
            None,
            Some(page.items.iter().map(|day| context.day(day)).collect()),
        ),
    };

    let report = JsonReport {
        generated_at: now.in_zone(tz).to_rfc3339(),
        timezone: timezone.to_string(),
        project: project.name.to_string(),
        position,
        total_count,
        weeks,
        days,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W, Tz>(
    writer: &mut W,
    store: &Store,
    project: &str,
    options: &ReportOptions,
    now: Milliseconds,
    tz: &Tz,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let project = FindProjects::new(&store.projects).by_name(project)?;
    let page = generate_report_page(store, &project, options, tz.clone());

    if options.json {
        let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());
        let output = format_report_json(&project, &page, now, tz, &timezone, options.format)?;
        writeln!(writer, "{output}")?;
    } else {
        let output = format_report(&project, &page, now, tz, options.format);
        write!(writer, "{output}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use insta::assert_snapshot;
    use wk_core::{
        AppKey, ClockIn, ClockOut, CreateProject, KeyValueStore, MarkRegisteredTime, TimeInterval,
    };

    use super::*;

    const MINUTE: i64 = 60_000;
    const NEW_YEAR: [i64; 6] = [
        1_577_606_247_000,
        1_577_690_413_000,
        1_577_779_099_000,
        1_577_985_643_000,
        1_578_211_149_000,
        1_578_297_584_000,
    ];

    fn options(by_day: bool, position: usize, size: usize) -> ReportOptions {
        ReportOptions {
            by_day,
            not_registered: false,
            json: false,
            range: LoadRange::new(position, size),
            format: HoursMinutesFormat::Digital,
        }
    }

    fn track(store: &Store, project: &Project, start: i64) -> TimeInterval {
        ClockIn::new(&store.intervals)
            .run(project, Milliseconds::new(start))
            .unwrap();
        ClockOut::new(&store.intervals)
            .run(project, Milliseconds::new(start + 10 * MINUTE))
            .unwrap()
    }

    /// Six intervals around New Year 2020; the third one is registered.
    fn new_year_store() -> (Store, Project) {
        let store = Store::default();
        let android = CreateProject::new(&store.projects).run("android").unwrap();
        let intervals: Vec<_> = NEW_YEAR
            .iter()
            .map(|&start| track(&store, &android, start))
            .collect();
        MarkRegisteredTime::new(&store.intervals)
            .run(&intervals[2..3])
            .unwrap();
        (store, android)
    }

    fn report(store: &Store, options: &ReportOptions) -> String {
        let mut output = Vec::new();
        run(
            &mut output,
            store,
            "android",
            options,
            Milliseconds::new(NEW_YEAR[5] + 60 * MINUTE),
            &Utc,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_report_weeks() {
        let (store, _) = new_year_store();
        let output = report(&store, &options(false, 0, 2));
        assert_snapshot!(output, @r"
        android: weeks 1-2 of 3

        Week of Jan 6, 2020  0:10
          Mon (Jan 6)  0:10 (-7:50)
            #6 07:59 - 08:09  0:10

        Week of Dec 30, 2019  0:40
          Sun (Jan 5)  0:10 (-7:50)
            #5 07:59 - 08:09  0:10
          Thu (Jan 2)  0:10 (-7:50)
            #4 17:20 - 17:30  0:10
          Tue (Dec 31)  0:10 (-7:50) [registered]
            #3 07:58 - 08:08  0:10 [registered]
          Mon (Dec 30)  0:10 (-7:50)
            #2 07:20 - 07:30  0:10
        ");
    }

    #[test]
    fn test_report_weeks_second_page() {
        let (store, _) = new_year_store();
        let output = report(&store, &options(false, 2, 2));
        assert_snapshot!(output, @r"
        android: weeks 3-3 of 3

        Week of Dec 23, 2019  0:10
          Sun (Dec 29)  0:10 (-7:50)
            #1 07:57 - 08:07  0:10
        ");
    }

    #[test]
    fn test_report_days_not_registered() {
        let (store, _) = new_year_store();
        let options = ReportOptions {
            not_registered: true,
            ..options(true, 1, 3)
        };
        let output = report(&store, &options);
        assert_snapshot!(output, @r"
        android: days 2-4 of 5

        Sun (Jan 5)  0:10 (-7:50)
          #5 07:59 - 08:09  0:10
        Thu (Jan 2)  0:10 (-7:50)
          #4 17:20 - 17:30  0:10
        Mon (Dec 30)  0:10 (-7:50)
          #2 07:20 - 07:30  0:10
        ");
    }

    #[test]
    fn test_report_hide_registered_setting() {
        let (store, _) = new_year_store();
        store.settings.set_bool(AppKey::HideRegisteredTime, true);
        let output = report(&store, &options(true, 0, 10));
        assert!(output.starts_with("android: days 1-5 of 5"));
        assert!(!output.contains("#3"));
    }

    #[test]
    fn test_report_active_interval_uses_now() {
        let store = Store::default();
        let android = CreateProject::new(&store.projects).run("android").unwrap();
        ClockIn::new(&store.intervals)
            .run(&android, Milliseconds::new(NEW_YEAR[5]))
            .unwrap();

        let output = report(&store, &options(true, 0, 10));
        assert_snapshot!(output, @r"
        android: days 1-1 of 1

        Mon (Jan 6)  1:00 (-7:00)
          #1 07:59  1:00 [active]
        ");
    }

    #[test]
    fn test_report_fraction_format() {
        let (store, _) = new_year_store();
        let options = ReportOptions {
            format: HoursMinutesFormat::Fraction,
            ..options(true, 0, 1)
        };
        let output = report(&store, &options);
        assert_snapshot!(output, @r"
        android: days 1-1 of 6

        Mon (Jan 6)  0.17 (-7.83)
          #6 07:59 - 08:09  0.17
        ");
    }

    #[test]
    fn test_report_empty_project() {
        let store = Store::default();
        CreateProject::new(&store.projects).run("android").unwrap();
        let output = report(&store, &options(false, 0, 10));
        assert_snapshot!(output, @r"
        No time recorded for android.

        Hint: Run 'wk clock in android' to start tracking.
        ");
    }

    #[test]
    fn test_report_position_past_the_end() {
        let (store, _) = new_year_store();
        let output = report(&store, &options(false, 5, 10));
        assert_snapshot!(output, @"android: no weeks at position 5 (3 total)");
    }

    #[test]
    fn test_report_json_output() {
        let (store, android) = new_year_store();
        let page = generate_report_page(&store, &android, &options(false, 1, 1), Utc);
        let output = format_report_json(
            &android,
            &page,
            Milliseconds::new(NEW_YEAR[5]),
            &Utc,
            "UTC",
            HoursMinutesFormat::Digital,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["project"], "android");
        assert_eq!(json["timezone"], "UTC");
        assert_eq!(json["generated_at"], "2020-01-06T07:59:44+00:00");
        assert_eq!(json["position"], 1);
        assert_eq!(json["total_count"], 3);
        assert!(json.get("days").is_none());

        let week = &json["weeks"][0];
        assert_eq!(week["start"], "2019-12-30");
        assert_eq!(week["title"], "Week of Dec 30, 2019");
        assert_eq!(week["time_summary"], "0:40");
        assert_eq!(week["registered"], false);
        assert_eq!(week["days"].as_array().unwrap().len(), 4);

        let registered_day = &week["days"][2];
        assert_eq!(registered_day["date"], "2019-12-31");
        assert_eq!(registered_day["time_difference"], "-7:50");
        assert_eq!(registered_day["registered"], true);

        let item = &registered_day["items"][0];
        assert_eq!(item["id"], 3);
        assert_eq!(item["state"], "registered");
        assert_eq!(item["start"], "2019-12-31T07:58:19+00:00");
        assert_eq!(item["stop"], "2019-12-31T08:08:19+00:00");
        assert_eq!(item["time_summary"], "0:10");
    }
}
