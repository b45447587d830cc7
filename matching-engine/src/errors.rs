use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
/// Error codes for the matching engine contract. Common errors are codes that
/// match up with the built-in contracts error reporting. Engine specific
/// errors start at 1300.
pub enum MatchingEngineError {
    // Common Errors
    InternalError = 1,
    AlreadyInitializedError = 3,

    UnauthorizedError = 4,

    NegativeAmountError = 8,
    BalanceError = 10,
    OverflowError = 12,

    // Message Errors (start at 1300)
    InvalidMessage = 1300,
    NotFastMarketOrder = 1301,
    MalformedPayload = 1302,

    // Endpoint Registry Errors
    ChainNotAllowed = 1310,
    InvalidEndpoint = 1311,
    InvalidSourceRouter = 1312,
    InvalidTargetRouter = 1313,

    // Auction Config Errors
    InvalidAuctionDuration = 1320,
    InvalidAuctionGracePeriod = 1321,
    UserPenaltyTooLarge = 1322,
    InitialPenaltyTooLarge = 1323,

    // Auction Errors
    AuctionNotActive = 1330,
    AuctionPeriodExpired = 1331,
    AuctionPeriodNotExpired = 1332,
    DeadlineExceeded = 1333,
    BidPriceTooHigh = 1334,
    OfferPriceNotImproved = 1335,
    NotHighestBidder = 1336,
    InvalidAuctionStatus = 1337,

    // Settlement Errors
    SlowMessageMismatch = 1340,
    FastFillAlreadyRedeemed = 1341,
    InvalidEmitterForFastFill = 1342,
}
