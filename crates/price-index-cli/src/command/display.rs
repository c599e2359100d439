use ethers_core::types::Address;
use price_index_ethereum::constants::Token;
use price_index_ethereum::ChainID;

// Display rows in a table whose columns have the given titles and widths
//
// Example:
// ________________________________________________________________________
// | Token    | Address                                    | Price (WETH) |
// |----------|--------------------------------------------|--------------|
// | USDC     | 0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48 | 0.000385     |
// ________________________________________________________________________
//
pub fn display_table(columns: &[(&str, usize)], rows: &[Vec<String>]) {
    let total: usize = columns.iter().map(|(_, width)| width + 3).sum::<usize>() + 1;

    println!("\n{}", "_".repeat(total));

    let header: Vec<String> = columns.iter().map(|(title, width)| format!(" {:^width$} ", title, width = width)).collect();
    println!("|{}|", header.join("|"));

    let separator: Vec<String> = columns.iter().map(|(_, width)| "-".repeat(width + 2)).collect();
    println!("|{}|", separator.join("|"));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(row)
            .map(|((_, width), cell)| format!(" {:<width$} ", cell, width = width))
            .collect();
        println!("|{}|", cells.join("|"));
    }

    println!("{}", "_".repeat(total));
}

/// Symbol of a known token, otherwise its cropped address
pub fn token_label(chain_id: Option<ChainID>, address: &Address) -> String {
    if let Some(token) = chain_id.and_then(|x| Token::find(&x, address)) {
        return token.symbol.to_string();
    }

    let address = format!("{:x}", address);
    format!("0x{}...{}", &address[..4], &address[address.len() - 4..])
}

pub fn full_address(address: &Address) -> String {
    format!("{:?}", address)
}

#[cfg(test)]
mod tests {
    use ethers_core::types::Address;
    use price_index_ethereum::constants::Token;
    use price_index_ethereum::ChainID;

    use crate::command::display::{full_address, token_label};

    #[test]
    fn known_tokens_are_labelled_with_symbol() {
        let usdc = Token::usdc(&ChainID::Mainnet).address;

        assert_eq!(token_label(Some(ChainID::Mainnet), &usdc), "USDC");
    }

    #[test]
    fn unknown_tokens_are_labelled_with_cropped_address() {
        let address = Address::from_low_u64_be(0xbeef);

        assert_eq!(token_label(Some(ChainID::Mainnet), &address), "0x0000...beef");
        assert_eq!(token_label(None, &address), "0x0000...beef");
    }

    #[test]
    fn full_address_is_not_cropped() {
        assert_eq!(full_address(&Address::from_low_u64_be(1)), "0x0000000000000000000000000000000000000001");
    }
}
