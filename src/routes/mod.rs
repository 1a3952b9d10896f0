pub(crate) mod auth;
pub(crate) mod portfolios;
pub(crate) mod root;
pub(crate) mod stocks;
pub(crate) mod watchlists;
