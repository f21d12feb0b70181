// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod support;
pub mod gate_tests;
pub mod harmonics_tests;
pub mod matcher_tests;
pub mod e2e_tests;
