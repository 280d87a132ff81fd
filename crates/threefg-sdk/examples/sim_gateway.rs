//! 仿真网关演示
//!
//! 把仿真引擎挂到寄存器网关上，像远程协议客户端那样通过
//! 线圈 / 寄存器地址完成一次合拢-张开循环。
//!
//! 运行：`cargo run --example sim_gateway`

use std::thread;
use std::time::Duration;
use threefg_sdk::prelude::*;

fn main() {
    threefg_sdk::logging::init();

    let gripper = SimulatedGripper::new(SimConfig {
        simulation_speed: 2.0,
        ..SimConfig::default()
    });
    let gateway = RegisterGateway::new(gripper, GatewayConfig::default());
    if !gateway.connect() {
        eprintln!("failed to connect to gripper");
        return;
    }

    // 目标力 70%，写 false 到 open/close 线圈触发合拢
    gateway.write_holding_registers(0, &[700]).expect("force in range");
    gateway.write_coils(0, &[false]).expect("coil in range");

    wait_ready(&gateway);
    print_state(&gateway, "after close");

    // true 触发张开
    gateway.write_coils(0, &[true]).expect("coil in range");
    wait_ready(&gateway);
    print_state(&gateway, "after open");

    gateway.close();
}

fn wait_ready<B: GripperBus>(gateway: &RegisterGateway<B>) {
    loop {
        let ready = gateway.read_coils(2, 1).expect("coil in range")[0];
        if ready {
            return;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

fn print_state<B: GripperBus>(gateway: &RegisterGateway<B>, label: &str) {
    let status = gateway.read_coils(2, 4).expect("coils in range");
    let width = gateway.read_input_registers(0, 1).expect("register in range")[0];
    println!(
        "{label}: ready={} open={} closed={} grip={} width={:.1}mm",
        status[0],
        status[1],
        status[2],
        status[3],
        width as f64 / 10.0
    );
}
