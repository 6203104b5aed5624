//! ABI binding for the BloomNFT auction contract
//!
//! The interface is fixed; only the calls and events the marketplace uses
//! are declared.

use alloy_primitives::U256;
use alloy_sol_types::sol;
use bloom_core::AuctionRecord;
use bloom_ports::{ContractError, ContractResult};

sol! {
    interface IBloomNFT {
        struct Auction {
            uint256 tokenId;
            address seller;
            uint256 startingBid;
            uint256 highestBid;
            address highestBidder;
            uint256 startTime;
            uint256 endTime;
            bool active;
            bool ended;
        }

        // Writes
        function mint(string memory ipfsHash) external payable returns (uint256);
        function createAuction(uint256 tokenId, uint256 startingBid, uint256 durationInSecond) external;
        function bid(uint256 tokenId) external payable;
        function endAuction(uint256 tokenId) external;
        function cancelAuction(uint256 tokenId) external;

        // Auction views
        function getAuction(uint256 tokenId) external view returns (Auction memory);
        function isAuctionActive(uint256 tokenId) external view returns (bool);
        function getTimeRemaining(uint256 tokenId) external view returns (uint256);

        // ERC-721 views
        function tokenURI(uint256 tokenId) external view returns (string memory);
        function ownerOf(uint256 tokenId) external view returns (address);
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function tokenByIndex(uint256 index) external view returns (uint256);
        function isInAuction(uint256 tokenId) external view returns (bool);

        // Fees
        function biayaAdmin() external view returns (uint256);
        function adminFeePercentage() external view returns (uint256);
        function getAccumulatedFees() external view returns (uint256);

        event NFTMinted(uint256 indexed tokenId, address indexed creator, string ipfsHash);
        event AuctionCreated(uint256 indexed tokenId, address indexed seller, uint256 startingBid, uint256 endTime);
        event BidPlaced(uint256 indexed tokenId, address indexed bidder, uint256 amount);
        event AuctionEnded(uint256 indexed tokenId, address indexed winner, uint256 amount);
        event AuctionCanceled(uint256 indexed tokenId);
    }
}

/// Narrow a `uint256` the contract uses for ids, counts or seconds
pub fn to_u64(value: U256, what: &str) -> ContractResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(ContractError::Decode(format!(
            "{} out of range: {}",
            what, value
        )));
    }
    Ok(value.as_limbs()[0])
}

impl IBloomNFT::Auction {
    /// Convert the decoded tuple into the domain record
    pub fn into_record(self) -> ContractResult<AuctionRecord> {
        Ok(AuctionRecord {
            token_id: to_u64(self.tokenId, "tokenId")?,
            seller: self.seller,
            starting_bid: self.startingBid,
            highest_bid: self.highestBid,
            highest_bidder: self.highestBidder,
            start_time: to_u64(self.startTime, "startTime")?,
            end_time: to_u64(self.endTime, "endTime")?,
            active: self.active,
            ended: self.ended,
        })
    }
}
