//! One repository per table. Each is a zero-sized type with associated async
//! functions taking the pool explicitly.

mod checklist_item_state_repo;
mod family_member_repo;
mod todo_repo;

pub use checklist_item_state_repo::ChecklistItemStateRepo;
pub use family_member_repo::FamilyMemberRepo;
pub use todo_repo::TodoRepo;
