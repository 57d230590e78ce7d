// All tests live in one integration test binary, separate binaries are slow
// to build.

mod cli;
mod hotel;
