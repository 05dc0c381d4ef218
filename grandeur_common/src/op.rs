/// Implements `std::ops` traits for a single-field newtype by forwarding to the wrapped value.
///
/// `binary` covers `T op T`, `scalar` covers `T op i64` (quantity arithmetic on money types), `inplace` the
/// assigning forms and `unary` the single-operand ones.
#[macro_export]
macro_rules! op {
    (binary $newtype:ident, $op_trait:ident, $op_fn:ident) => {
        impl $op_trait for $newtype {
            type Output = Self;

            fn $op_fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$op_fn(rhs.0))
            }
        }
    };

    (scalar $newtype:ident, $op_trait:ident, $op_fn:ident) => {
        impl $op_trait<i64> for $newtype {
            type Output = Self;

            fn $op_fn(self, rhs: i64) -> Self::Output {
                Self(self.0.$op_fn(rhs))
            }
        }
    };

    (inplace $newtype:ident, $op_trait:ident, $op_fn:ident) => {
        impl $op_trait for $newtype {
            fn $op_fn(&mut self, rhs: Self) {
                self.0.$op_fn(rhs.0)
            }
        }
    };

    (unary $newtype:ident, $op_trait:ident, $op_fn:ident) => {
        impl $op_trait for $newtype {
            type Output = Self;

            fn $op_fn(self) -> Self::Output {
                Self(self.0.$op_fn())
            }
        }
    };
}
