//! Description templates for the log list view.
//!
//! One template per catalogue event, keyed in a dispatch table so an
//! unknown event is an explicit miss instead of a switch fallthrough.
//! Each template interpolates the resolved actor name, the display
//! fields captured in the payload, and a relative timestamp.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::{LogData, LogEvent};

/// Everything a template may interpolate.
pub struct RenderContext<'a> {
    /// Resolved actor display name ("You" for the viewer's own entries).
    pub actor: &'a str,
    pub data: &'a LogData,
    /// Relative timestamp, e.g. "3 hours ago".
    pub when: &'a str,
}

type Template = fn(&RenderContext<'_>) -> String;

/// Event-keyed template table.
pub struct LogTemplates {
    templates: HashMap<LogEvent, Template>,
}

impl LogTemplates {
    /// The standard catalogue.
    pub fn standard() -> Self {
        let mut templates: HashMap<LogEvent, Template> = HashMap::new();

        templates.insert(LogEvent::UserCreation, user_creation);
        templates.insert(LogEvent::UserUpdate, user_update);
        templates.insert(LogEvent::UserDeletion, user_deletion);
        templates.insert(LogEvent::UndeleteUser, undelete_user);
        templates.insert(LogEvent::UserLogin, user_login);
        templates.insert(LogEvent::UserImport, user_import);
        templates.insert(LogEvent::UserExport, user_export);

        templates.insert(LogEvent::CourseCreation, course_creation);
        templates.insert(LogEvent::CourseUpdate, course_update);
        templates.insert(LogEvent::CourseDeletion, course_deletion);
        templates.insert(LogEvent::UndeleteCourse, undelete_course);
        templates.insert(LogEvent::IntakeCreation, intake_creation);
        templates.insert(LogEvent::IntakeDeletion, intake_deletion);
        templates.insert(LogEvent::UndeleteIntake, undelete_intake);

        templates.insert(LogEvent::UnitCreation, unit_creation);
        templates.insert(LogEvent::UnitUpdate, unit_update);
        templates.insert(LogEvent::UnitDeletion, unit_deletion);
        templates.insert(LogEvent::UndeleteUnit, undelete_unit);

        templates.insert(LogEvent::GroupCreation, group_creation);
        templates.insert(LogEvent::GroupUserDeletion, group_deletion);
        templates.insert(LogEvent::UndeleteGroup, undelete_group);
        templates.insert(LogEvent::GroupMemberAdded, group_member_added);
        templates.insert(LogEvent::GroupMemberRemoved, group_member_removed);

        templates.insert(LogEvent::DiscussionCreation, discussion_creation);
        templates.insert(LogEvent::DiscussionDeletion, discussion_deletion);
        templates.insert(LogEvent::UndeleteDiscussion, undelete_discussion);

        templates.insert(LogEvent::NotificationCreation, notification_creation);
        templates.insert(LogEvent::NotificationDeletion, notification_deletion);
        templates.insert(LogEvent::UndeleteNotification, undelete_notification);

        templates.insert(LogEvent::EventCreation, event_creation);
        templates.insert(LogEvent::EventDeletion, event_deletion);
        templates.insert(LogEvent::UndeleteEvent, undelete_event);

        templates.insert(LogEvent::GradeSubmitted, grade_submitted);

        Self { templates }
    }

    /// Render the description for one entry; `None` when the event has
    /// no template.
    pub fn render(&self, event: &LogEvent, ctx: &RenderContext<'_>) -> Option<String> {
        self.templates.get(event).map(|template| template(ctx))
    }

    /// Whether the event is in the catalogue.
    pub fn knows(&self, event: &LogEvent) -> bool {
        self.templates.contains_key(event)
    }
}

impl Default for LogTemplates {
    fn default() -> Self {
        Self::standard()
    }
}

fn user_name(data: &LogData) -> &str {
    match data {
        LogData::User { full_name, .. } => full_name,
        _ => "a user",
    }
}

fn course_label(data: &LogData) -> String {
    match data {
        LogData::Course { name, code, .. } => format!("<strong>{}</strong> ({})", name, code),
        _ => "a course".to_string(),
    }
}

fn unit_label(data: &LogData) -> String {
    match data {
        LogData::Unit { name, .. } => format!("<strong>{}</strong>", name),
        _ => "a unit".to_string(),
    }
}

fn group_label(data: &LogData) -> String {
    match data {
        LogData::Group { name, .. } => format!("<strong>{}</strong>", name),
        _ => "a group".to_string(),
    }
}

fn user_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} created the user <strong>{}</strong> - {}",
        ctx.actor,
        user_name(ctx.data),
        ctx.when
    )
}

fn user_update(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} updated the user <strong>{}</strong> - {}",
        ctx.actor,
        user_name(ctx.data),
        ctx.when
    )
}

fn user_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the user <strong>{}</strong> - {}",
        ctx.actor,
        user_name(ctx.data),
        ctx.when
    )
}

fn undelete_user(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the user <strong>{}</strong> - {}",
        ctx.actor,
        user_name(ctx.data),
        ctx.when
    )
}

fn user_login(ctx: &RenderContext<'_>) -> String {
    format!("{} logged in - {}", ctx.actor, ctx.when)
}

fn user_import(ctx: &RenderContext<'_>) -> String {
    format!("{} imported users - {}", ctx.actor, ctx.when)
}

fn user_export(ctx: &RenderContext<'_>) -> String {
    format!("{} exported users - {}", ctx.actor, ctx.when)
}

fn course_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} created the course {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn course_update(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} updated the course {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn course_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the course {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn undelete_course(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the course {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn intake_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} created the intake {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn intake_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the intake {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn undelete_intake(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the intake {} - {}",
        ctx.actor,
        course_label(ctx.data),
        ctx.when
    )
}

fn unit_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} created the unit {} - {}",
        ctx.actor,
        unit_label(ctx.data),
        ctx.when
    )
}

fn unit_update(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} updated the unit {} - {}",
        ctx.actor,
        unit_label(ctx.data),
        ctx.when
    )
}

fn unit_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the unit {} - {}",
        ctx.actor,
        unit_label(ctx.data),
        ctx.when
    )
}

fn undelete_unit(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the unit {} - {}",
        ctx.actor,
        unit_label(ctx.data),
        ctx.when
    )
}

fn group_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} created the group {} - {}",
        ctx.actor,
        group_label(ctx.data),
        ctx.when
    )
}

fn group_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the group {} and its memberships - {}",
        ctx.actor,
        group_label(ctx.data),
        ctx.when
    )
}

fn undelete_group(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the group {} and its memberships - {}",
        ctx.actor,
        group_label(ctx.data),
        ctx.when
    )
}

fn group_member_added(ctx: &RenderContext<'_>) -> String {
    match ctx.data {
        LogData::GroupMember {
            group_name,
            user_name,
            ..
        } => format!(
            "{} added <strong>{}</strong> to the group <strong>{}</strong> - {}",
            ctx.actor, user_name, group_name, ctx.when
        ),
        _ => format!("{} added a member to a group - {}", ctx.actor, ctx.when),
    }
}

fn group_member_removed(ctx: &RenderContext<'_>) -> String {
    match ctx.data {
        LogData::GroupMember {
            group_name,
            user_name,
            ..
        } => format!(
            "{} removed <strong>{}</strong> from the group <strong>{}</strong> - {}",
            ctx.actor, user_name, group_name, ctx.when
        ),
        _ => format!("{} removed a member from a group - {}", ctx.actor, ctx.when),
    }
}

fn discussion_title(data: &LogData) -> String {
    match data {
        LogData::Discussion { title, .. } => format!("<strong>{}</strong>", title),
        _ => "a discussion".to_string(),
    }
}

fn discussion_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} started the discussion {} - {}",
        ctx.actor,
        discussion_title(ctx.data),
        ctx.when
    )
}

fn discussion_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the discussion {} - {}",
        ctx.actor,
        discussion_title(ctx.data),
        ctx.when
    )
}

fn undelete_discussion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the discussion {} - {}",
        ctx.actor,
        discussion_title(ctx.data),
        ctx.when
    )
}

fn notification_title(data: &LogData) -> String {
    match data {
        LogData::Notification { title, .. } => format!("<strong>{}</strong>", title),
        _ => "a notification".to_string(),
    }
}

fn notification_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} published the notification {} - {}",
        ctx.actor,
        notification_title(ctx.data),
        ctx.when
    )
}

fn notification_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the notification {} - {}",
        ctx.actor,
        notification_title(ctx.data),
        ctx.when
    )
}

fn undelete_notification(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the notification {} - {}",
        ctx.actor,
        notification_title(ctx.data),
        ctx.when
    )
}

fn event_title(data: &LogData) -> String {
    match data {
        LogData::Event { title, .. } => format!("<strong>{}</strong>", title),
        _ => "an event".to_string(),
    }
}

fn event_creation(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} scheduled the event {} - {}",
        ctx.actor,
        event_title(ctx.data),
        ctx.when
    )
}

fn event_deletion(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} deleted the event {} - {}",
        ctx.actor,
        event_title(ctx.data),
        ctx.when
    )
}

fn undelete_event(ctx: &RenderContext<'_>) -> String {
    format!(
        "{} restored the event {} - {}",
        ctx.actor,
        event_title(ctx.data),
        ctx.when
    )
}

fn grade_submitted(ctx: &RenderContext<'_>) -> String {
    match ctx.data {
        LogData::Grade { score, .. } => format!(
            "{} submitted a grade of {:.1} - {}",
            ctx.actor, score, ctx.when
        ),
        _ => format!("{} submitted a grade - {}", ctx.actor, ctx.when),
    }
}

/// Relative timestamp, e.g. "3 hours ago".
pub fn time_ago(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - from).num_seconds().max(0);

    match seconds {
        0..=59 => "just now".to_string(),
        60..=119 => "a minute ago".to_string(),
        120..=3599 => format!("{} minutes ago", seconds / 60),
        3600..=7199 => "an hour ago".to_string(),
        7200..=86_399 => format!("{} hours ago", seconds / 3600),
        86_400..=172_799 => "a day ago".to_string(),
        172_800..=2_591_999 => format!("{} days ago", seconds / 86_400),
        2_592_000..=5_183_999 => "a month ago".to_string(),
        5_184_000..=31_535_999 => format!("{} months ago", seconds / 2_592_000),
        31_536_000..=63_071_999 => "a year ago".to_string(),
        _ => format!("{} years ago", seconds / 31_536_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn course_data() -> LogData {
        LogData::Course {
            course_id: Uuid::now_v7(),
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            intake: false,
        }
    }

    #[test]
    fn test_course_deletion_description() {
        let templates = LogTemplates::standard();
        let data = course_data();
        let ctx = RenderContext {
            actor: "Ada Lovelace",
            data: &data,
            when: "3 hours ago",
        };

        let description = templates.render(&LogEvent::CourseDeletion, &ctx).unwrap();
        assert_eq!(
            description,
            "Ada Lovelace deleted the course <strong>Algebra I</strong> (ALG1) - 3 hours ago"
        );
    }

    #[test]
    fn test_viewer_renders_as_you() {
        let templates = LogTemplates::standard();
        let data = course_data();
        let ctx = RenderContext {
            actor: "You",
            data: &data,
            when: "just now",
        };

        let description = templates.render(&LogEvent::CourseCreation, &ctx).unwrap();
        assert!(description.starts_with("You created the course"));
    }

    #[test]
    fn test_unknown_event_renders_nothing() {
        let templates = LogTemplates::standard();
        let data = LogData::Empty;
        let ctx = RenderContext {
            actor: "Ada Lovelace",
            data: &data,
            when: "just now",
        };

        let event = LogEvent::Unknown("BADGE_AWARDED".to_string());
        assert!(templates.render(&event, &ctx).is_none());
        assert!(!templates.knows(&event));
    }

    #[test]
    fn test_mismatched_payload_degrades_gracefully() {
        let templates = LogTemplates::standard();
        let data = LogData::Empty;
        let ctx = RenderContext {
            actor: "Ada Lovelace",
            data: &data,
            when: "just now",
        };

        let description = templates.render(&LogEvent::UnitDeletion, &ctx).unwrap();
        assert_eq!(description, "Ada Lovelace deleted a unit - just now");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(90), now), "a minute ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "a day ago");
        assert_eq!(time_ago(now - Duration::days(10), now), "10 days ago");
        assert_eq!(time_ago(now - Duration::days(90), now), "3 months ago");
        assert_eq!(time_ago(now - Duration::days(800), now), "2 years ago");
    }

    #[test]
    fn test_future_timestamps_clamp_to_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::hours(1), now), "just now");
    }
}
