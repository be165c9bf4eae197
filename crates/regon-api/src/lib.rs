// regon-api: Async SOAP transport for the GUS REGON (BIR 1.1) service

pub mod environment;
pub mod error;
pub mod session;
pub mod soap;
pub mod transport;
pub mod validate;
pub mod xml;

pub use environment::{Environment, SANDBOX_API_KEY};
pub use error::Error;
pub use session::{Session, SessionConfig};
pub use soap::{Request, SearchCriterion};
pub use transport::{TlsMode, TransportConfig};
pub use validate::validate;
pub use xml::Element;
