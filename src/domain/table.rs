use std::fmt;

/// A physical seating unit in the dining room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: i64,
    pub number: i32,
    pub is_occupied: bool,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Стол #{}", self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_table_number() {
        let table = Table {
            id: 7,
            number: 12,
            is_occupied: false,
        };
        assert_eq!(table.to_string(), "Стол #12");
    }
}
