pub mod appointments;
pub mod patients;
pub mod teeth_work;
pub mod users;

pub use appointments::Entity as Appointments;
pub use patients::Entity as Patients;
pub use teeth_work::Entity as TeethWork;
pub use users::Entity as Users;
