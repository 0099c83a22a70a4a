//! Netmap — interactive network-topology visualizer.

fn main() {
    netmap::run();
}
