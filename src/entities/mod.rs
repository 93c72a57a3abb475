//! SeaORM entity definitions, one per table.

pub mod instructor;
pub mod member;
pub mod membership_type;
pub mod payment;
pub mod schedule;
pub mod training_class;

pub use instructor::{Entity as Instructor, Model as InstructorModel};
pub use member::{Entity as Member, Model as MemberModel};
pub use membership_type::{Entity as MembershipType, Model as MembershipTypeModel};
pub use payment::{Entity as Payment, Model as PaymentModel};
pub use schedule::{Entity as Schedule, Model as ScheduleModel};
pub use training_class::{Entity as TrainingClass, Model as TrainingClassModel};
