use alloy_primitives::{FixedBytes, fixed_bytes};
use alloy_sol_types::sol;

sol! {
    /// Canonical transfer event. The signature string covers both the
    /// two-indexed-argument shape (id in the data payload) and the
    /// three-indexed-argument shape; the decoder handles either.
    event Transfer(address indexed from, address indexed to, uint256 tokenId);

    /// ERC-165 introspection entry point.
    function supportsInterface(bytes4 interfaceId) external view returns (bool);

    /// Accessor conventionally exposed by proxy contracts to report the
    /// delegate implementation address.
    function implementation() external view returns (address);
}

/// ERC-721 interface identifier probed via `supportsInterface`.
pub const ERC721_INTERFACE_ID: FixedBytes<4> = fixed_bytes!("80ac58cd");
