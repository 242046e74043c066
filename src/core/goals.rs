//! # Goal Board
//!
//! State for the goal list screen: an ordered list of goals, the draft in
//! the "New goal" field, and the modal that shows the props table.
//!
//! Goals are appended at the tail and deleted without confirmation.

use log::info;

use crate::core::composer::Composer;
use crate::core::state::Alert;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: String,
    pub value: String,
}

/// How the props modal enters the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAnimation {
    Slide,
    Fade,
    None,
}

impl ModalAnimation {
    pub fn label(&self) -> &'static str {
        match self {
            ModalAnimation::Slide => "slide",
            ModalAnimation::Fade => "fade",
            ModalAnimation::None => "none",
        }
    }
}

/// One row of the modal's reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalProp {
    pub prop: &'static str,
    pub description: &'static str,
    pub syntax: &'static str,
}

pub const MODAL_PROPS: [ModalProp; 9] = [
    ModalProp {
        prop: "animationType",
        description: "Controls how the modal animates (slide, fade, none).",
        syntax: "animationType=\"slide\"",
    },
    ModalProp {
        prop: "transparent",
        description: "Makes modal background transparent.",
        syntax: "transparent={true}",
    },
    ModalProp {
        prop: "visible",
        description: "Determines if modal is shown.",
        syntax: "visible={modalVisible}",
    },
    ModalProp {
        prop: "onRequestClose",
        description: "Required for Android back button / swipe dismiss.",
        syntax: "onRequestClose={() => setModalVisible(false)}",
    },
    ModalProp {
        prop: "onShow",
        description: "Called when modal is fully visible.",
        syntax: "onShow={() => console.log(\"Modal shown\")}",
    },
    ModalProp {
        prop: "onDismiss (iOS)",
        description: "Called when modal is dismissed.",
        syntax: "onDismiss={() => alert(\"Modal closed\")}",
    },
    ModalProp {
        prop: "presentationStyle (iOS)",
        description: "Controls how modal looks (fullScreen, pageSheet, formSheet)",
        syntax: "presentationStyle=\"pageSheet\"",
    },
    ModalProp {
        prop: "statusBarTranslucent (Android)",
        description: "Allows modal to go under the system status bar.",
        syntax: "statusBarTranslucent={true}",
    },
    ModalProp {
        prop: "supportedOrientations (iOS)",
        description: "Allowed screen orientations for modal.",
        syntax: "supportedOrientations={[\"portrait\",\"landscape\"]}",
    },
];

pub struct GoalBoard {
    pub goals: Vec<Goal>,
    pub input: Composer,
    pub modal: Option<ModalAnimation>,
    pub alert: Option<Alert>,
}

impl Default for GoalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalBoard {
    pub fn new() -> Self {
        let goals = [
            ("1", "Learn React Native"),
            ("2", "Build a Modal Example"),
            ("3", "Test on iOS and Android"),
        ]
        .into_iter()
        .map(|(id, value)| Goal {
            id: id.to_string(),
            value: value.to_string(),
        })
        .collect();

        Self {
            goals,
            input: Composer::new(),
            modal: None,
            alert: None,
        }
    }

    /// Appends the draft as a new goal. A blank draft raises an alert.
    pub fn add_goal(&mut self) -> bool {
        match self.input.submit() {
            Some(value) => {
                let goal = Goal {
                    id: uuid::Uuid::new_v4().to_string(),
                    value,
                };
                info!("Added goal {}", goal.id);
                self.goals.push(goal);
                true
            }
            None => {
                self.alert = Some(Alert::new("Invalid input", "Please enter a goal."));
                false
            }
        }
    }

    /// Removes the goal with `id`. Unknown ids are ignored.
    pub fn delete_goal(&mut self, id: &str) {
        self.goals.retain(|goal| goal.id != id);
    }

    pub fn show_modal(&mut self, animation: ModalAnimation) {
        info!("Modal shown ({})", animation.label());
        self.modal = Some(animation);
    }

    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            info!("Modal closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_three_seed_goals() {
        let board = GoalBoard::new();
        let ids: Vec<_> = board.goals.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(board.modal.is_none());
    }

    #[test]
    fn add_goal_appends_at_tail() {
        let mut board = GoalBoard::new();
        board.input.on_change_text("Ship it");

        assert!(board.add_goal());

        assert_eq!(board.goals.len(), 4);
        assert_eq!(board.goals[3].value, "Ship it");
        assert!(board.input.draft.is_empty());
        assert!(board.alert.is_none());
    }

    #[test]
    fn blank_goal_raises_alert() {
        let mut board = GoalBoard::new();
        board.input.on_change_text("   ");

        assert!(!board.add_goal());

        assert_eq!(board.goals.len(), 3);
        assert_eq!(
            board.alert,
            Some(Alert::new("Invalid input", "Please enter a goal."))
        );
    }

    #[test]
    fn delete_goal_by_id() {
        let mut board = GoalBoard::new();
        board.delete_goal("2");
        let ids: Vec<_> = board.goals.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        board.delete_goal("missing");
        assert_eq!(board.goals.len(), 2);
    }

    #[test]
    fn modal_open_and_close() {
        let mut board = GoalBoard::new();
        board.show_modal(ModalAnimation::Fade);
        assert_eq!(board.modal, Some(ModalAnimation::Fade));
        board.close_modal();
        assert!(board.modal.is_none());
    }

    #[test]
    fn props_table_covers_animation_type_first() {
        assert_eq!(MODAL_PROPS[0].prop, "animationType");
        assert_eq!(MODAL_PROPS.len(), 9);
    }
}
