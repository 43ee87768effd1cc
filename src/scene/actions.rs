//! Action graphs
//!
//! The editor serializes interactivity as a tree: the root lists triggers,
//! each trigger lists the actions it fires, and an action may carry
//! follow-up actions (`then`) or combined actions (`combine`). Conditions
//! appear in the tree as nodes of type `condition` guarding their children.

use serde::Deserialize;
use serde_json::Value;

use crate::scene::NodeHandle;

/// Event that fires a group of actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    OnPick,
    OnDoublePick,
    OnLeftPick,
    OnRightPick,
    OnCenterPick,
    OnPickDown,
    OnPickUp,
    OnPickOut,
    OnLongPress,
    OnPointerOver,
    OnPointerOut,
    OnEveryFrame,
    OnIntersectionEnter,
    OnIntersectionExit,
    OnKeyDown,
    OnKeyUp,
    /// A trigger unknown to the importer, kept by name.
    Other(String),
}

impl Trigger {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "OnPickTrigger" => Self::OnPick,
            "OnDoublePickTrigger" => Self::OnDoublePick,
            "OnLeftPickTrigger" => Self::OnLeftPick,
            "OnRightPickTrigger" => Self::OnRightPick,
            "OnCenterPickTrigger" => Self::OnCenterPick,
            "OnPickDownTrigger" => Self::OnPickDown,
            "OnPickUpTrigger" => Self::OnPickUp,
            "OnPickOutTrigger" => Self::OnPickOut,
            "OnLongPressTrigger" => Self::OnLongPress,
            "OnPointerOverTrigger" => Self::OnPointerOver,
            "OnPointerOutTrigger" => Self::OnPointerOut,
            "OnEveryFrameTrigger" => Self::OnEveryFrame,
            "OnIntersectionEnterTrigger" => Self::OnIntersectionEnter,
            "OnIntersectionExitTrigger" => Self::OnIntersectionExit,
            "OnKeyDownTrigger" => Self::OnKeyDown,
            "OnKeyUpTrigger" => Self::OnKeyUp,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A single action with its resolved properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub detached: bool,
    /// `(name, value)` pairs as serialized.
    pub properties: Vec<(String, Value)>,
    /// Guard evaluated before this action runs.
    pub condition: Option<Box<Action>>,
    /// Actions run once this one completes.
    pub then: Vec<Action>,
    /// Actions run together with this one.
    pub combine: Vec<Action>,
}

impl Action {
    /// Looks up a serialized property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerActions {
    pub trigger: Trigger,
    /// Trigger parameter (e.g. the key for key triggers).
    pub parameter: Option<Value>,
    pub actions: Vec<Action>,
}

/// Interactivity attached to a mesh or to the scene itself.
#[derive(Debug, Clone, Default)]
pub struct ActionManager {
    /// `None` for the scene-level manager.
    pub owner: Option<NodeHandle>,
    pub triggers: Vec<TriggerActions>,
}

impl ActionManager {
    /// Builds a manager from its serialized graph.
    #[must_use]
    pub fn parse(graph: &ActionGraphPayload, owner: Option<NodeHandle>) -> Self {
        let triggers = graph
            .children
            .iter()
            .filter(|node| !node.detached)
            .map(|trigger| TriggerActions {
                trigger: Trigger::from_name(&trigger.name),
                parameter: trigger
                    .properties
                    .iter()
                    .find(|p| p.name == "parameter")
                    .map(|p| p.value.clone()),
                actions: trigger
                    .children
                    .iter()
                    .filter_map(|child| parse_action(child, None))
                    .collect(),
            })
            .collect();

        Self { owner, triggers }
    }

    /// Total number of actions, including chained and combined ones.
    #[must_use]
    pub fn action_count(&self) -> usize {
        fn count(action: &Action) -> usize {
            1 + action.then.iter().map(count).sum::<usize>() + action.combine.iter().map(count).sum::<usize>()
        }
        self.triggers
            .iter()
            .flat_map(|t| t.actions.iter())
            .map(count)
            .sum()
    }
}

/// Converts an action node; condition nodes fold into their first child.
fn parse_action(node: &ActionNodePayload, condition: Option<Action>) -> Option<Action> {
    if node.detached {
        return None;
    }
    if node.node_type == ActionNodeType::Condition {
        let guard = leaf(node, None);
        return node.children.first().and_then(|child| parse_action(child, Some(guard)));
    }

    let mut action = leaf(node, condition);
    action.combine = node
        .combine
        .iter()
        .filter_map(|child| parse_action(child, None))
        .collect();
    action.then = node
        .children
        .iter()
        .filter_map(|child| parse_action(child, None))
        .collect();
    Some(action)
}

fn leaf(node: &ActionNodePayload, condition: Option<Action>) -> Action {
    Action {
        name: node.name.clone(),
        detached: node.detached,
        properties: node
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect(),
        condition: condition.map(Box::new),
        then: Vec::new(),
        combine: Vec::new(),
    }
}

// ============================================================================
// Serialized form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionNodeType {
    Trigger,
    #[default]
    Action,
    Condition,
    Flowcontrol,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPropertyPayload {
    pub name: String,
    pub value: Value,
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionNodePayload {
    #[serde(rename = "type")]
    pub node_type: ActionNodeType,
    pub name: String,
    pub detached: bool,
    pub properties: Vec<ActionPropertyPayload>,
    pub children: Vec<ActionNodePayload>,
    pub combine: Vec<ActionNodePayload>,
}

/// Root of a serialized action graph.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionGraphPayload {
    pub name: String,
    pub children: Vec<ActionNodePayload>,
}
