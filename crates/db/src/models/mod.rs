pub mod checklist_item_state;
pub mod family_member;
pub mod todo;
