//! Enumerations shared by the Trader and Market Data APIs.
//!
//! Each enum serializes to the exact string the API expects and exposes its
//! accepted values through `VARIANTS` for building input schemas.

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value
            pub const VARIANTS: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// How long an order stays working.
    OrderDuration {
        Day => "DAY",
        GoodTillCancel => "GOOD_TILL_CANCEL",
        FillOrKill => "FILL_OR_KILL",
        ImmediateOrCancel => "IMMEDIATE_OR_CANCEL",
        EndOfWeek => "END_OF_WEEK",
        EndOfMonth => "END_OF_MONTH",
        NextEndOfMonth => "NEXT_END_OF_MONTH",
        Unknown => "UNKNOWN",
    }
);

string_enum!(
    OrderType {
        Market => "MARKET",
        Limit => "LIMIT",
        Stop => "STOP",
        StopLimit => "STOP_LIMIT",
        TrailingStop => "TRAILING_STOP",
        Cabinet => "CABINET",
        NonMarketable => "NON_MARKETABLE",
        MarketOnClose => "MARKET_ON_CLOSE",
        Exercise => "EXERCISE",
        TrailingStopLimit => "TRAILING_STOP_LIMIT",
        NetDebit => "NET_DEBIT",
        NetCredit => "NET_CREDIT",
        NetZero => "NET_ZERO",
        LimitOnClose => "LIMIT_ON_CLOSE",
        Unknown => "UNKNOWN",
    }
);

string_enum!(
    Session {
        Normal => "NORMAL",
        Am => "AM",
        Pm => "PM",
        Seamless => "SEAMLESS",
    }
);

string_enum!(
    OrderStrategyType {
        Single => "SINGLE",
        Cancel => "CANCEL",
        Recall => "RECALL",
        Pair => "PAIR",
        Flatten => "FLATTEN",
        TwoDaySwap => "TWO_DAY_SWAP",
        BlastAll => "BLAST_ALL",
        Oco => "OCO",
        Trigger => "TRIGGER",
    }
);

string_enum!(
    ComplexOrderStrategyType {
        None => "NONE",
        Covered => "COVERED",
        Vertical => "VERTICAL",
        BackRatio => "BACK_RATIO",
        Calendar => "CALENDAR",
        Diagonal => "DIAGONAL",
        Straddle => "STRADDLE",
        Strangle => "STRANGLE",
        CollarSynthetic => "COLLAR_SYNTHETIC",
        Butterfly => "BUTTERFLY",
        Condor => "CONDOR",
        IronCondor => "IRON_CONDOR",
        VerticalRoll => "VERTICAL_ROLL",
        CollarWithStock => "COLLAR_WITH_STOCK",
        DoubleDiagonal => "DOUBLE_DIAGONAL",
        UnbalancedButterfly => "UNBALANCED_BUTTERFLY",
        UnbalancedCondor => "UNBALANCED_CONDOR",
        UnbalancedIronCondor => "UNBALANCED_IRON_CONDOR",
        UnbalancedVerticalRoll => "UNBALANCED_VERTICAL_ROLL",
        MutualFundSwap => "MUTUAL_FUND_SWAP",
        Custom => "CUSTOM",
    }
);

string_enum!(
    /// Trade instruction on an order leg.
    Instruction {
        Buy => "BUY",
        Sell => "SELL",
        BuyToCover => "BUY_TO_COVER",
        SellShort => "SELL_SHORT",
        BuyToOpen => "BUY_TO_OPEN",
        BuyToClose => "BUY_TO_CLOSE",
        SellToOpen => "SELL_TO_OPEN",
        SellToClose => "SELL_TO_CLOSE",
        Exchange => "EXCHANGE",
        SellShortExempt => "SELL_SHORT_EXEMPT",
    }
);

string_enum!(
    AssetType {
        Equity => "EQUITY",
        MutualFund => "MUTUAL_FUND",
        Option => "OPTION",
        Future => "FUTURE",
        Forex => "FOREX",
        Index => "INDEX",
        CashEquivalent => "CASH_EQUIVALENT",
        FixedIncome => "FIXED_INCOME",
        Product => "PRODUCT",
        Currency => "CURRENCY",
        CollectiveInvestment => "COLLECTIVE_INVESTMENT",
    }
);

string_enum!(
    OrderStatus {
        AwaitingParentOrder => "AWAITING_PARENT_ORDER",
        AwaitingCondition => "AWAITING_CONDITION",
        AwaitingStopCondition => "AWAITING_STOP_CONDITION",
        AwaitingManualReview => "AWAITING_MANUAL_REVIEW",
        Accepted => "ACCEPTED",
        AwaitingUrOut => "AWAITING_UR_OUT",
        PendingActivation => "PENDING_ACTIVATION",
        Queued => "QUEUED",
        Working => "WORKING",
        Rejected => "REJECTED",
        PendingCancel => "PENDING_CANCEL",
        Canceled => "CANCELED",
        PendingReplace => "PENDING_REPLACE",
        Replaced => "REPLACED",
        Filled => "FILLED",
        Expired => "EXPIRED",
        New => "NEW",
        AwaitingReleaseTime => "AWAITING_RELEASE_TIME",
        PendingAcknowledgement => "PENDING_ACKNOWLEDGEMENT",
        PendingRecall => "PENDING_RECALL",
        Unknown => "UNKNOWN",
    }
);

string_enum!(
    TransactionType {
        Trade => "TRADE",
        ReceiveAndDeliver => "RECEIVE_AND_DELIVER",
        DividendOrInterest => "DIVIDEND_OR_INTEREST",
        AchReceipt => "ACH_RECEIPT",
        AchDisbursement => "ACH_DISBURSEMENT",
        CashReceipt => "CASH_RECEIPT",
        CashDisbursement => "CASH_DISBURSEMENT",
        ElectronicFund => "ELECTRONIC_FUND",
        WireOut => "WIRE_OUT",
        WireIn => "WIRE_IN",
        Journal => "JOURNAL",
        Memorandum => "MEMORANDUM",
        MarginCall => "MARGIN_CALL",
        MoneyMarket => "MONEY_MARKET",
        SmaAdjustment => "SMA_ADJUSTMENT",
    }
);

string_enum!(
    ContractType {
        Call => "CALL",
        Put => "PUT",
        All => "ALL",
    }
);

string_enum!(
    ChainStrategy {
        Single => "SINGLE",
        Analytical => "ANALYTICAL",
        Covered => "COVERED",
        Vertical => "VERTICAL",
        Calendar => "CALENDAR",
        Strangle => "STRANGLE",
        Straddle => "STRADDLE",
        Butterfly => "BUTTERFLY",
        Condor => "CONDOR",
        Diagonal => "DIAGONAL",
        Collar => "COLLAR",
        Roll => "ROLL",
    }
);

string_enum!(
    /// Moneyness filter for option chains.
    StrikeRange {
        InTheMoney => "ITM",
        NearTheMoney => "NTM",
        OutOfTheMoney => "OTM",
        StrikesAboveMarket => "SAK",
        StrikesBelowMarket => "SBK",
        StrikesNearMarket => "SNK",
        All => "ALL",
    }
);

string_enum!(
    ExpirationMonth {
        Jan => "JAN",
        Feb => "FEB",
        Mar => "MAR",
        Apr => "APR",
        May => "MAY",
        Jun => "JUN",
        Jul => "JUL",
        Aug => "AUG",
        Sep => "SEP",
        Oct => "OCT",
        Nov => "NOV",
        Dec => "DEC",
        All => "ALL",
    }
);

string_enum!(
    Entitlement {
        PayingNonPro => "PN",
        NonPayingPro => "NP",
        PayingPro => "PP",
    }
);

string_enum!(
    PeriodType {
        Day => "day",
        Month => "month",
        Year => "year",
        Ytd => "ytd",
    }
);

string_enum!(
    FrequencyType {
        Minute => "minute",
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
);

string_enum!(
    Projection {
        SymbolSearch => "symbol-search",
        SymbolRegex => "symbol-regex",
        DescSearch => "desc-search",
        DescRegex => "desc-regex",
        Search => "search",
        Fundamental => "fundamental",
    }
);

string_enum!(
    Market {
        Equity => "equity",
        Option => "option",
        Bond => "bond",
        Future => "future",
        Forex => "forex",
    }
);

string_enum!(
    MoversIndex {
        Dji => "$DJI",
        Compx => "$COMPX",
        Spx => "$SPX",
        Nyse => "NYSE",
        Nasdaq => "NASDAQ",
        Otcbb => "OTCBB",
        IndexAll => "INDEX_ALL",
        EquityAll => "EQUITY_ALL",
        OptionAll => "OPTION_ALL",
        OptionPut => "OPTION_PUT",
        OptionCall => "OPTION_CALL",
    }
);

string_enum!(
    MoversSort {
        Volume => "VOLUME",
        Trades => "TRADES",
        PercentChangeUp => "PERCENT_CHANGE_UP",
        PercentChangeDown => "PERCENT_CHANGE_DOWN",
    }
);

/// Accept an identifier sent either as a JSON string or a number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
