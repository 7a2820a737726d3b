//! Nifty 50 universe and sector classification

/// Sector label for symbols outside the static map
pub const UNCLASSIFIED: &str = "Unclassified";

/// Exchange suffix used by the provider for NSE listings
pub const NSE_SUFFIX: &str = ".NS";

/// Nifty 50 constituents
pub const NIFTY50_SYMBOLS: [&str; 50] = [
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "BHARTIARTL.NS", "ICICIBANK.NS",
    "INFY.NS", "SBIN.NS", "LICI.NS", "ITC.NS", "HINDUNILVR.NS",
    "LT.NS", "KOTAKBANK.NS", "AXISBANK.NS", "ASIANPAINT.NS", "MARUTI.NS",
    "SUNPHARMA.NS", "TITAN.NS", "ULTRACEMCO.NS", "BAJFINANCE.NS", "NESTLEIND.NS",
    "ADANIENT.NS", "HCLTECH.NS", "WIPRO.NS", "NTPC.NS", "JSWSTEEL.NS",
    "POWERGRID.NS", "TATAMOTORS.NS", "COALINDIA.NS", "M&M.NS", "BAJAJFINSV.NS",
    "TATASTEEL.NS", "TECHM.NS", "GRASIM.NS", "ADANIPORTS.NS", "INDUSINDBK.NS",
    "CIPLA.NS", "DRREDDY.NS", "EICHERMOT.NS", "BRITANNIA.NS", "APOLLOHOSP.NS",
    "BPCL.NS", "DIVISLAB.NS", "TRENT.NS", "BAJAJ-AUTO.NS", "ONGC.NS",
    "HEROMOTOCO.NS", "SBILIFE.NS", "HDFCLIFE.NS", "SHRIRAMFIN.NS", "LTIM.NS",
];

/// Sector map keyed by bare NSE ticker
pub static SECTORS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    // Energy
    "RELIANCE" => "Energy",
    "ONGC" => "Energy",
    "BPCL" => "Energy",
    "COALINDIA" => "Energy",

    // Information technology
    "TCS" => "Information Technology",
    "INFY" => "Information Technology",
    "HCLTECH" => "Information Technology",
    "WIPRO" => "Information Technology",
    "TECHM" => "Information Technology",
    "LTIM" => "Information Technology",

    // Banks
    "HDFCBANK" => "Banking",
    "ICICIBANK" => "Banking",
    "SBIN" => "Banking",
    "KOTAKBANK" => "Banking",
    "AXISBANK" => "Banking",
    "INDUSINDBK" => "Banking",

    // Non-bank financials and insurance
    "BAJFINANCE" => "Financial Services",
    "BAJAJFINSV" => "Financial Services",
    "SHRIRAMFIN" => "Financial Services",
    "LICI" => "Financial Services",
    "SBILIFE" => "Financial Services",
    "HDFCLIFE" => "Financial Services",

    // Telecom
    "BHARTIARTL" => "Telecommunication",

    // Consumer staples
    "ITC" => "FMCG",
    "HINDUNILVR" => "FMCG",
    "NESTLEIND" => "FMCG",
    "BRITANNIA" => "FMCG",

    // Consumer discretionary
    "ASIANPAINT" => "Consumer Durables",
    "TITAN" => "Consumer Durables",
    "TRENT" => "Consumer Services",

    // Autos
    "MARUTI" => "Automobile",
    "TATAMOTORS" => "Automobile",
    "M&M" => "Automobile",
    "EICHERMOT" => "Automobile",
    "BAJAJ-AUTO" => "Automobile",
    "HEROMOTOCO" => "Automobile",

    // Healthcare
    "SUNPHARMA" => "Healthcare",
    "CIPLA" => "Healthcare",
    "DRREDDY" => "Healthcare",
    "DIVISLAB" => "Healthcare",
    "APOLLOHOSP" => "Healthcare",

    // Materials
    "ULTRACEMCO" => "Construction Materials",
    "GRASIM" => "Construction Materials",
    "JSWSTEEL" => "Metals & Mining",
    "TATASTEEL" => "Metals & Mining",

    // Industrials and utilities
    "LT" => "Construction",
    "ADANIENT" => "Metals & Mining",
    "ADANIPORTS" => "Services",
    "NTPC" => "Power",
    "POWERGRID" => "Power",
};

/// Strip the exchange suffix (`TCS.NS` -> `TCS`)
pub fn display_symbol(symbol: &str) -> &str {
    symbol.strip_suffix(NSE_SUFFIX).unwrap_or(symbol)
}

/// Sector for a symbol, with or without the exchange suffix
pub fn sector_for(symbol: &str) -> &'static str {
    let upper = symbol.trim().to_uppercase();
    SECTORS
        .get(display_symbol(&upper))
        .copied()
        .unwrap_or(UNCLASSIFIED)
}

/// Whether the symbol belongs to the Nifty 50
pub fn is_constituent(symbol: &str) -> bool {
    NIFTY50_SYMBOLS.contains(&symbol)
}
