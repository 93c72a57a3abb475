//! Entity repositories. Each one borrows the connection handed to it by the
//! request context; none of them holds state of its own.

pub mod classes;
pub mod instructors;
pub mod members;
pub mod payments;
pub mod schedules;

pub use classes::ClassRepository;
pub use instructors::InstructorRepository;
pub use members::MemberRepository;
pub use payments::PaymentRepository;
pub use schedules::ScheduleRepository;
