pub mod flutterwave;
