//! Chat message rendering. Output is Telegram-flavoured HTML.
//!
//! Renderers either produce the complete text or fail with [`MissingField`];
//! a partially formatted message is never returned.

use herald_domain::{Alert, BuildDuration, ContainerSummary, DeploymentEvent};

use crate::error::MissingField;

fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, MissingField> {
    value.ok_or(MissingField(field))
}

/// Escapes the three characters Telegram's HTML parser reserves.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Like [`escape_html`], plus both quote characters so the value is safe
/// inside an attribute.
pub fn escape_attr(raw: &str) -> String {
    escape_html(raw)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn start_deployment(event: &DeploymentEvent) -> Result<String, MissingField> {
    let deployable_url = require(event.deployable_url.as_deref(), "deployable_url")?;
    let project = require(event.project_name(), "project.name")?;
    let git_ref = require(event.git_ref.as_deref(), "ref")?;
    let user = require(event.user_name(), "user.name")?;
    let commit_title = require(event.commit_title.as_deref(), "commit_title")?;
    let environment = require(event.environment.as_deref(), "environment")?;

    Ok(format!(
        "⚙️ Запущена сборка проекта:\n\
         <a href=\"{deployable_url}\">{project}</a>\n\n\
         🌳: {git_ref}\n\
         👨🏼‍💻: {user}\n\n\
         ✍️ Last commit:\n <code>{commit_title}</code>\n\n\
         ⌛️ Окружение <b>{environment}</b> скоро будет доступно",
        deployable_url = escape_attr(deployable_url),
        project = escape_html(project),
        git_ref = escape_html(git_ref),
        user = escape_html(user),
        commit_title = escape_html(commit_title),
        environment = escape_html(environment),
    ))
}

pub fn success_deployment(
    event: &DeploymentEvent,
    elapsed: BuildDuration,
) -> Result<String, MissingField> {
    let project = require(event.project_name(), "project.name")?;
    let environment = require(event.environment.as_deref(), "environment")?;
    let external_url = require(
        event.environment_external_url.as_deref(),
        "environment_external_url",
    )?;
    let deployable_url = require(event.deployable_url.as_deref(), "deployable_url")?;

    Ok(format!(
        "✅ Сборка проекта завершена: {project}\n\n\
         ⌛️ Время сборки: {elapsed}\n\n\
         Окружение <b>{environment}</b> доступно по ссылке:\n\
         <b>{external_url}</b>\n\n\
         Отчет о сборке:\n{deployable_url}",
        project = escape_html(project),
        environment = escape_html(environment),
        external_url = escape_html(external_url),
        deployable_url = escape_html(deployable_url),
    ))
}

pub fn failed_deployment(event: &DeploymentEvent) -> Result<String, MissingField> {
    let project = require(event.project_name(), "project.name")?;
    let deployable_url = require(event.deployable_url.as_deref(), "deployable_url")?;

    Ok(format!(
        "🔥 Oops!\n\n\
         Ошибка при сборке проекта: {project}\n\n\
         Отчет о сборке\n{deployable_url}",
        project = escape_html(project),
        deployable_url = escape_html(deployable_url),
    ))
}

pub fn canceled_deployment(event: &DeploymentEvent) -> Result<String, MissingField> {
    let project = require(event.project_name(), "project.name")?;
    let user = require(event.user_name(), "user.name")?;

    Ok(format!(
        "🤔 Сборка проекта {project} остановлена\n\n👨🏼‍💻: {user}",
        project = escape_html(project),
        user = escape_html(user),
    ))
}

pub fn alert_firing(alert: &Alert) -> Result<String, MissingField> {
    let alert_name = require(alert.label("alertname"), "labels.alertname")?;
    let instance = require(alert.label("instance"), "labels.instance")?;
    let summary = require(alert.annotation("summary"), "annotations.summary")?;

    Ok(format!(
        "🔥 Alert firing: {}\n<code>source={}</code>\n\n{}",
        escape_html(alert_name),
        escape_html(instance),
        escape_html(summary),
    ))
}

/// `original` is the plain text Telegram echoes back in the callback, so
/// it has to be escaped again.
pub fn alert_accepted(original: &str, mention: &str) -> String {
    format!(
        "{}\n\n{} не прошёл мимо и сейчас разберется с этим алертом!",
        escape_html(original),
        escape_html(mention)
    )
}

/// `None` when every container is running.
pub fn suspicious_containers(containers: &[ContainerSummary]) -> Option<String> {
    let lines: String = containers
        .iter()
        .filter(|container| !container.state().is_running())
        .map(|container| {
            format!(
                "{} {}: <b>{}</b>\n",
                container.state().emoji(),
                escape_html(container.display_name()),
                escape_html(&container.state),
            )
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "🤨 Эта парочка контейнеров ведет себя подозрительно: \n\n{lines}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_domain::{DeploymentStatus, NamedRef};

    fn event(status: DeploymentStatus) -> DeploymentEvent {
        let mut event = DeploymentEvent::new("42", status);
        event.project = Some(NamedRef::named("shop"));
        event.environment = Some("staging".into());
        event.git_ref = Some("main".into());
        event.user = Some(NamedRef::named("Ada"));
        event.commit_title = Some("Fix <checkout> & totals".into());
        event.deployable_url = Some("https://gitlab.example/jobs/7".into());
        event.environment_external_url = Some("https://staging.shop.example".into());
        event
    }

    #[test]
    fn test_start_message() {
        let text = start_deployment(&event(DeploymentStatus::Running)).unwrap();
        assert!(text.starts_with("⚙️ Запущена сборка проекта:\n"));
        assert!(text.contains("<a href=\"https://gitlab.example/jobs/7\">shop</a>"));
        assert!(text.contains("🌳: main\n"));
        assert!(text.contains("👨🏼‍💻: Ada\n"));
        assert!(text.contains("<code>Fix &lt;checkout&gt; &amp; totals</code>"));
        assert!(text.ends_with("Окружение <b>staging</b> скоро будет доступно"));
    }

    #[test]
    fn test_success_message_includes_elapsed_and_urls() {
        let text = success_deployment(
            &event(DeploymentStatus::Success),
            BuildDuration::from_secs(125),
        )
        .unwrap();
        assert!(text.contains("Сборка проекта завершена: shop"));
        assert!(text.contains("⌛️ Время сборки: 02:05"));
        assert!(text.contains("<b>https://staging.shop.example</b>"));
        assert!(text.ends_with("Отчет о сборке:\nhttps://gitlab.example/jobs/7"));
    }

    #[test]
    fn test_urls_are_escaped() {
        let mut event = event(DeploymentStatus::Running);
        event.deployable_url = Some("https://g.example/jobs/1?a=1&b='2'".into());
        event.environment_external_url = Some("https://s.example/?x=<y>".into());

        let start = start_deployment(&event).unwrap();
        assert!(start.contains(
            "<a href=\"https://g.example/jobs/1?a=1&amp;b=&#39;2&#39;\">shop</a>"
        ));

        let success = success_deployment(&event, BuildDuration::from_secs(1)).unwrap();
        assert!(success.contains("<b>https://s.example/?x=&lt;y&gt;</b>"));
        assert!(success.ends_with("https://g.example/jobs/1?a=1&amp;b='2'"));

        let failed = failed_deployment(&event).unwrap();
        assert!(failed.ends_with("https://g.example/jobs/1?a=1&amp;b='2'"));
    }

    #[test]
    fn test_accepted_alert_reescapes_original_text() {
        let text = alert_accepted("latency < 5ms & rising", "@ops");
        assert_eq!(
            text,
            "latency &lt; 5ms &amp; rising\n\n@ops не прошёл мимо и сейчас разберется с этим алертом!"
        );
    }

    #[test]
    fn test_failed_message() {
        let text = failed_deployment(&event(DeploymentStatus::Failed)).unwrap();
        assert_eq!(
            text,
            "🔥 Oops!\n\nОшибка при сборке проекта: shop\n\nОтчет о сборке\nhttps://gitlab.example/jobs/7"
        );
    }

    #[test]
    fn test_canceled_message_mentions_project_and_user_only() {
        let text = canceled_deployment(&event(DeploymentStatus::Canceled)).unwrap();
        assert_eq!(text, "🤔 Сборка проекта shop остановлена\n\n👨🏼‍💻: Ada");
    }

    #[test]
    fn test_missing_field_is_reported() {
        let mut incomplete = event(DeploymentStatus::Running);
        incomplete.commit_title = None;
        assert_eq!(
            start_deployment(&incomplete),
            Err(MissingField("commit_title"))
        );

        let bare = DeploymentEvent::new("1", DeploymentStatus::Canceled);
        assert_eq!(canceled_deployment(&bare), Err(MissingField("project.name")));
    }

    #[test]
    fn test_alert_message() {
        let mut alert = Alert::default();
        alert.labels.insert("alertname".into(), "HighLoad".into());
        alert.labels.insert("instance".into(), "node-1:9100".into());
        alert.annotations.insert("summary".into(), "load > 8".into());

        assert_eq!(
            alert_firing(&alert).unwrap(),
            "🔥 Alert firing: HighLoad\n<code>source=node-1:9100</code>\n\nload &gt; 8"
        );

        alert.annotations.clear();
        assert_eq!(alert_firing(&alert), Err(MissingField("annotations.summary")));
    }

    #[test]
    fn test_suspicious_containers_lists_only_non_running() {
        let containers: Vec<ContainerSummary> = serde_json::from_value(serde_json::json!([
            { "Id": "a", "Names": ["/web"], "State": "running" },
            { "Id": "b", "Names": ["/worker"], "State": "exited" },
            { "Id": "c", "Names": ["/cron"], "State": "restarting" }
        ]))
        .unwrap();

        let report = suspicious_containers(&containers).unwrap();
        assert_eq!(
            report,
            "🤨 Эта парочка контейнеров ведет себя подозрительно: \n\n\
             🛑 worker: <b>exited</b>\n🔄 cron: <b>restarting</b>\n"
        );
        assert!(suspicious_containers(&containers[..1]).is_none());
    }
}
