//! Like/unlike toggle on articles.
use crate::config::Config;
use crate::dom::{Document, Element, NodeId};
use crate::errors::ToggleError;
use crate::models::{LikeAction, LikeRequest};
use crate::transport::Form;
use tracing::warn;

pub fn is_control(element: &Element) -> bool {
    element.matches("a", "like")
}

fn is_counter(element: &Element) -> bool {
    element.id.as_deref() == Some("like-count") || element.has_class("like-count")
}

fn is_icon(element: &Element) -> bool {
    element.matches("img", "img-like")
}

pub fn read_request(doc: &Document, control: NodeId) -> Result<LikeRequest, ToggleError> {
    let article_id = doc
        .data(control, "article_id")
        .ok_or(ToggleError::MissingAttribute("article_id"))?;
    let raw = doc
        .data(control, "action")
        .ok_or(ToggleError::MissingAttribute("action"))?;
    let action = LikeAction::parse(raw).ok_or_else(|| ToggleError::InvalidAttribute {
        attribute: "action",
        value: raw.to_string(),
    })?;

    Ok(LikeRequest {
        article_id: article_id.to_string(),
        action,
    })
}

pub fn form(request: &LikeRequest) -> Form {
    vec![
        ("article_id", request.article_id.clone()),
        ("action", request.action.as_str().to_string()),
    ]
}

/// Nearest ancestor of the control (itself included) holding a like counter.
/// Falls back to the document root when the page has none.
pub fn scope(doc: &Document, control: NodeId) -> NodeId {
    doc.ancestors(control)
        .find(|candidate| doc.find_in(*candidate, is_counter).is_some())
        .unwrap_or_else(|| doc.root())
}

/// Applies a confirmed toggle for the action that was sent. Returns the new count
/// when the counter could be updated.
pub fn apply_success(
    doc: &mut Document,
    control: NodeId,
    sent: LikeAction,
    config: &Config,
) -> Option<i64> {
    let scope = scope(doc, control);
    let counter = doc.find_in(scope, is_counter);
    let icon = doc.find_in(scope, is_icon);

    let last_count = counter.and_then(|id| {
        let text = doc.text(id)?.trim();
        let parsed = text.parse::<i64>().ok();
        if parsed.is_none() {
            warn!(text, "like counter does not hold an integer");
        }
        parsed
    });

    let (next, icon_src) = match sent {
        LikeAction::Like => (LikeAction::Unlike, &config.unlike_icon),
        LikeAction::Unlike => (LikeAction::Like, &config.like_icon),
    };
    let next_count = last_count.map(|count| match sent {
        LikeAction::Like => count.saturating_add(1),
        LikeAction::Unlike => count.saturating_sub(1),
    });

    doc.set_data(control, "action", next.as_str());
    if let Some(icon) = icon {
        doc.set_attr(icon, "src", icon_src.as_str());
    }

    let (Some(counter), Some(count)) = (counter, next_count) else {
        return None;
    };
    doc.set_text(counter, count.to_string());
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Markup;

    fn article(id: &str, action: &str, count: &str) -> Markup {
        Markup::new("article")
            .child(
                Markup::new("a")
                    .class("like")
                    .data("article_id", id)
                    .data("action", action)
                    .attr("href", "#")
                    .child(
                        Markup::new("img")
                            .class("img-like")
                            .attr("src", "/static/assets/like.svg"),
                    ),
            )
            .child(Markup::new("span").class("like-count").text(count))
    }

    fn controls(doc: &Document) -> Vec<NodeId> {
        doc.find_all(is_control)
    }

    #[test]
    fn like_increments_and_swaps_icon() {
        let mut doc = Document::new(article("7", "like", "4"));
        let control = controls(&doc)[0];
        let config = Config::default();

        assert_eq!(apply_success(&mut doc, control, LikeAction::Like, &config), Some(5));
        assert_eq!(doc.data(control, "action"), Some("unlike"));
        let icon = doc.find_all(is_icon)[0];
        assert_eq!(doc.attr(icon, "src"), Some(config.unlike_icon.as_str()));
    }

    #[test]
    fn unlike_may_drive_the_counter_negative() {
        let mut doc = Document::new(article("7", "unlike", "0"));
        let control = controls(&doc)[0];

        assert_eq!(
            apply_success(&mut doc, control, LikeAction::Unlike, &Config::default()),
            Some(-1)
        );
        assert_eq!(doc.data(control, "action"), Some("like"));
    }

    #[test]
    fn each_article_updates_only_its_own_counter() {
        let mut doc = Document::new(
            Markup::new("body")
                .child(article("1", "like", "10"))
                .child(article("2", "like", "20")),
        );
        let second = controls(&doc)[1];
        apply_success(&mut doc, second, LikeAction::Like, &Config::default());

        let counts: Vec<&str> = doc
            .find_all(is_counter)
            .into_iter()
            .filter_map(|id| doc.text(id))
            .collect();
        assert_eq!(counts, vec!["10", "21"]);
        assert_eq!(doc.data(controls(&doc)[0], "action"), Some("like"));
    }

    #[test]
    fn legacy_global_counter_is_found_from_the_root() {
        let mut doc = Document::new(
            Markup::new("body")
                .child(
                    Markup::new("a")
                        .class("like")
                        .data("article_id", "3")
                        .data("action", "like"),
                )
                .child(Markup::new("span").id("like-count").text("2")),
        );
        let control = controls(&doc)[0];
        assert_eq!(
            apply_success(&mut doc, control, LikeAction::Like, &Config::default()),
            Some(3)
        );
    }

    #[test]
    fn garbled_counter_is_left_alone() {
        let mut doc = Document::new(article("7", "like", "many"));
        let control = controls(&doc)[0];

        assert_eq!(
            apply_success(&mut doc, control, LikeAction::Like, &Config::default()),
            None
        );
        assert_eq!(doc.data(control, "action"), Some("unlike"));
        let counter = doc.find_all(is_counter)[0];
        assert_eq!(doc.text(counter), Some("many"));
    }

    #[test]
    fn counter_at_the_integer_limit_saturates() {
        let max = i64::MAX.to_string();
        let mut doc = Document::new(article("7", "like", &max));
        let control = controls(&doc)[0];

        assert_eq!(
            apply_success(&mut doc, control, LikeAction::Like, &Config::default()),
            Some(i64::MAX)
        );
        assert_eq!(doc.data(control, "action"), Some("unlike"));
        let counter = doc.find_all(is_counter)[0];
        assert_eq!(doc.text(counter), Some(max.as_str()));

        let min = i64::MIN.to_string();
        let mut doc = Document::new(article("7", "unlike", &min));
        let control = controls(&doc)[0];
        assert_eq!(
            apply_success(&mut doc, control, LikeAction::Unlike, &Config::default()),
            Some(i64::MIN)
        );
    }

    #[test]
    fn request_requires_known_action() {
        let doc = Document::new(article("7", "love", "1"));
        let control = controls(&doc)[0];
        assert!(matches!(
            read_request(&doc, control),
            Err(ToggleError::InvalidAttribute { attribute: "action", .. })
        ));

        let doc = Document::new(Markup::new("a").class("like").data("action", "like"));
        assert!(matches!(
            read_request(&doc, doc.root()),
            Err(ToggleError::MissingAttribute("article_id"))
        ));
    }
}
