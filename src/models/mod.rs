//! Typed data-transfer shapes: the person schema and the lookup response.

pub mod person;
pub mod response;

pub use person::{
    Certification, Company, Education, EducationSchool, Email, EmailFilter, Experience,
    ExperienceTitle, Location, Person, SchoolRef,
};
pub use response::{ErrorDetail, Response};
