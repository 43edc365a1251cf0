//! Subscribe/unsubscribe toggle on user profiles.
use crate::config::Config;
use crate::dom::{Document, Element, Markup, NodeId};
use crate::errors::ToggleError;
use crate::models::{SubscribeRequest, SubscriptionAction};
use crate::transport::Form;

pub fn is_control(element: &Element) -> bool {
    element.matches("a", "subscription")
}

pub fn read_request(doc: &Document, control: NodeId) -> Result<SubscribeRequest, ToggleError> {
    let username = doc
        .data(control, "name")
        .ok_or(ToggleError::MissingAttribute("name"))?;
    let raw = doc
        .data(control, "action")
        .ok_or(ToggleError::MissingAttribute("action"))?;
    let action = SubscriptionAction::parse(raw).ok_or_else(|| ToggleError::InvalidAttribute {
        attribute: "action",
        value: raw.to_string(),
    })?;

    Ok(SubscribeRequest {
        username: username.to_string(),
        action,
    })
}

pub fn form(request: &SubscribeRequest) -> Form {
    vec![
        ("username", request.username.clone()),
        ("action", request.action.as_str().to_string()),
    ]
}

/// Every subscription control for `username`.
pub fn controls_for(doc: &Document, username: &str) -> Vec<NodeId> {
    doc.find_by_data("a", "subscription", "name", username)
}

/// Every `span.subscribed` indicator container for `username`.
pub fn indicators_for(doc: &Document, username: &str) -> Vec<NodeId> {
    doc.find_by_data("span", "subscribed", "name", username)
}

/// Applies a confirmed toggle to all controls and indicators of `username`.
/// The previous action is read at this point, not taken from the request: from
/// the clicked control, else from the first matching control that holds a valid
/// one. Returns it, or `None` when no control could supply it.
pub fn apply_success(
    doc: &mut Document,
    clicked: NodeId,
    username: &str,
    config: &Config,
) -> Option<SubscriptionAction> {
    let controls = controls_for(doc, username);
    let indicators = indicators_for(doc, username);

    let action_of = |id: NodeId| doc.data(id, "action").and_then(SubscriptionAction::parse);
    let previous = Some(clicked)
        .filter(|id| controls.contains(id))
        .and_then(action_of)
        .or_else(|| controls.iter().find_map(|id| action_of(*id)))?;

    let label = match previous {
        SubscriptionAction::Add => &config.unsubscribe_label,
        SubscriptionAction::Delete => &config.subscribe_label,
    };
    for control in &controls {
        doc.set_data(*control, "action", previous.flipped().as_str());
        doc.set_text(*control, label.as_str());
    }

    for indicator in indicators {
        match previous {
            SubscriptionAction::Add => {
                let marker = Markup::new("p").text(config.subscribed_marker.as_str());
                doc.append_child(indicator, marker);
            }
            SubscriptionAction::Delete => {
                doc.remove_children(indicator, |e| e.tag.eq_ignore_ascii_case("p"));
            }
        }
    }

    Some(previous)
}
