pub use corvus_core::*;

#[cfg(feature = "extract")]
pub mod extract {
    pub use corvus_extract::*;
}

#[cfg(feature = "ledger")]
pub mod ledger {
    pub use corvus_ledger::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use corvus_client::*;
}

pub mod prelude {
    pub use corvus_core::prelude::*;

    #[cfg(feature = "extract")]
    pub use corvus_extract::{ExtractError, ExtractMode, extract_package, unpack_archive};

    #[cfg(feature = "ledger")]
    pub use corvus_ledger::{HashRecords, Ledger, build::assemble};

    #[cfg(feature = "client")]
    pub use corvus_client::{PackageClient, PackageDescriptor};
}
